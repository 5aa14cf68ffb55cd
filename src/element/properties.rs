use super::{CreatureKind, Element, ExplosionKind, Slope, Sound};
use crate::types::Direction;

/// Sides of an element that things roll off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slopes {
    #[allow(missing_docs)]
    pub up: bool,
    #[allow(missing_docs)]
    pub down: bool,
    #[allow(missing_docs)]
    pub left: bool,
    #[allow(missing_docs)]
    pub right: bool,
}

impl Slopes {
    const NONE: Slopes = Slopes {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    const ALL: Slopes = Slopes {
        up: true,
        down: true,
        left: true,
        right: true,
    };

    fn of(slope: Slope) -> Slopes {
        match slope {
            Slope::UpLeft => Slopes {
                up: true,
                left: true,
                ..Slopes::NONE
            },
            Slope::UpRight => Slopes {
                up: true,
                right: true,
                ..Slopes::NONE
            },
            Slope::DownLeft => Slopes {
                down: true,
                left: true,
                ..Slopes::NONE
            },
            Slope::DownRight => Slopes {
                down: true,
                right: true,
                ..Slopes::NONE
            },
        }
    }

    /// Is the side facing `dir` sloped. Diagonals and `Still` never are.
    pub fn toward(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
            _ => false,
        }
    }
}

/// The static properties of an element. Never changes while a cave runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Properties {
    /// the player can walk in to it, leaving nothing behind
    pub diggable: bool,
    /// a resting element that starts falling when there is room
    pub can_fall: bool,
    /// an element in motion
    pub falling: bool,
    /// explosions destroy it
    pub explodable: bool,
    /// a falling element landing on it makes it explode
    pub explodes_by_hit: bool,
    /// flies next to it explode
    pub blows_up_flies: bool,
    /// amoeba can grow in to it
    pub amoeba_consumes: bool,
    /// sides things roll off
    pub slopes: Slopes,
    /// the player can push it
    pub pushable: bool,
    /// what it leaves when it explodes by itself or is hit
    pub explosion_result: ExplosionKind,
    /// collecting it counts as collecting a diamond
    pub counts_as_diamond: bool,
    /// the pneumatic hammer can break it
    pub can_be_hammered: bool,
    /// a conveyor belt under it carries it along
    pub moved_by_conveyor: bool,
    /// this is one of the player elements
    pub player: bool,
    /// sound made when it lands, is collected or is dug
    pub sound: Option<Sound>,
}

const BASE: Properties = Properties {
    diggable: false,
    can_fall: false,
    falling: false,
    explodable: true,
    explodes_by_hit: false,
    blows_up_flies: false,
    amoeba_consumes: false,
    slopes: Slopes::NONE,
    pushable: false,
    explosion_result: ExplosionKind::Space,
    counts_as_diamond: false,
    can_be_hammered: false,
    moved_by_conveyor: false,
    player: false,
    sound: None,
};

const DIRT: Properties = Properties {
    diggable: true,
    amoeba_consumes: true,
    sound: Some(Sound::Dirt),
    ..BASE
};

const WALL: Properties = Properties {
    can_be_hammered: true,
    ..BASE
};

const STEEL: Properties = Properties {
    explodable: false,
    ..BASE
};

const HEAVY: Properties = Properties {
    can_fall: true,
    slopes: Slopes::ALL,
    pushable: true,
    moved_by_conveyor: true,
    sound: Some(Sound::Stone),
    ..BASE
};

const GEM: Properties = Properties {
    can_fall: true,
    slopes: Slopes::ALL,
    counts_as_diamond: true,
    moved_by_conveyor: true,
    sound: Some(Sound::Diamond),
    ..BASE
};

const PLAYER: Properties = Properties {
    explodes_by_hit: true,
    blows_up_flies: true,
    player: true,
    ..BASE
};

const EXIT: Properties = Properties {
    explodable: false,
    ..BASE
};

const SWITCH: Properties = Properties {
    sound: Some(Sound::Switch),
    ..BASE
};

fn falling(p: Properties) -> Properties {
    Properties {
        can_fall: false,
        falling: true,
        pushable: false,
        moved_by_conveyor: false,
        ..p
    }
}

fn creature(kind: CreatureKind) -> Properties {
    let explosion_result = match kind {
        CreatureKind::Butterfly | CreatureKind::AltButterfly => ExplosionKind::Diamond,
        CreatureKind::Stonefly => ExplosionKind::Stone,
        _ => ExplosionKind::Space,
    };
    Properties {
        explodes_by_hit: kind != CreatureKind::Biter,
        explosion_result,
        ..BASE
    }
}

pub(super) fn properties_of(element: Element) -> Properties {
    match element {
        Element::Space => Properties {
            diggable: true,
            amoeba_consumes: true,
            sound: Some(Sound::Walk),
            ..BASE
        },
        Element::Dirt | Element::Dirt2 => DIRT,
        Element::DirtSloped(s) => Properties {
            slopes: Slopes::of(s),
            ..DIRT
        },
        Element::DirtLoose => DIRT,
        Element::DirtBall => Properties {
            can_fall: true,
            slopes: Slopes::ALL,
            moved_by_conveyor: true,
            sound: Some(Sound::DirtBall),
            ..BASE
        },
        Element::DirtBallFalling => Properties {
            falling: true,
            slopes: Slopes::ALL,
            sound: Some(Sound::DirtBall),
            ..BASE
        },
        Element::Brick => Properties {
            slopes: Slopes::ALL,
            ..WALL
        },
        Element::BrickSloped(s) => Properties {
            slopes: Slopes::of(s),
            ..WALL
        },
        Element::BrickEatable => Properties {
            diggable: true,
            slopes: Slopes::ALL,
            sound: Some(Sound::Dirt),
            ..WALL
        },
        Element::BrickNonSliding => WALL,
        Element::MagicWall => Properties {
            sound: Some(Sound::MagicWall),
            ..WALL
        },
        Element::Steel => STEEL,
        Element::SteelSloped(s) => Properties {
            slopes: Slopes::of(s),
            ..STEEL
        },
        Element::SteelExplodable => BASE,
        Element::SteelEatable => Properties {
            diggable: true,
            can_be_hammered: true,
            sound: Some(Sound::Dirt),
            ..STEEL
        },
        Element::Gravestone => STEEL,
        Element::ExpandingWall(_) => Properties {
            slopes: Slopes::ALL,
            sound: Some(Sound::ExpandingWall),
            ..WALL
        },
        Element::Stone => HEAVY,
        Element::StoneFalling => falling(HEAVY),
        Element::MegaStone => Properties {
            sound: Some(Sound::MegaStone),
            ..HEAVY
        },
        Element::MegaStoneFalling => Properties {
            sound: Some(Sound::MegaStone),
            ..falling(HEAVY)
        },
        Element::FlyingStone => Properties {
            moved_by_conveyor: false,
            ..HEAVY
        },
        Element::FlyingStoneFlying => falling(HEAVY),
        Element::Diamond => GEM,
        Element::DiamondFalling => falling(GEM),
        Element::FlyingDiamond => Properties {
            moved_by_conveyor: false,
            ..GEM
        },
        Element::FlyingDiamondFlying => falling(GEM),
        Element::NitroPack => Properties {
            explodes_by_hit: true,
            explosion_result: ExplosionKind::Nitro,
            sound: Some(Sound::NitroPack),
            ..HEAVY
        },
        Element::NitroPackFalling => Properties {
            explodes_by_hit: true,
            explosion_result: ExplosionKind::Nitro,
            sound: Some(Sound::NitroPack),
            ..falling(HEAVY)
        },
        Element::NitroPackExplode => Properties {
            explosion_result: ExplosionKind::Nitro,
            ..BASE
        },
        Element::Nut => Properties {
            sound: Some(Sound::Nut),
            ..HEAVY
        },
        Element::NutFalling => Properties {
            sound: Some(Sound::Nut),
            ..falling(HEAVY)
        },
        Element::Key(_) => Properties {
            diggable: false,
            sound: Some(Sound::Key),
            ..BASE
        },
        Element::Door(_) => Properties {
            sound: Some(Sound::Door),
            ..BASE
        },
        Element::DiamondKey => Properties {
            sound: Some(Sound::Key),
            ..BASE
        },
        Element::TrappedDiamond => STEEL,
        Element::Clock => Properties {
            sound: Some(Sound::Clock),
            moved_by_conveyor: true,
            ..BASE
        },
        Element::Sweet => Properties {
            sound: Some(Sound::Sweet),
            ..BASE
        },
        Element::PneumaticHammer => Properties {
            sound: Some(Sound::Pneumatic),
            ..BASE
        },
        Element::Skeleton => Properties {
            moved_by_conveyor: true,
            sound: Some(Sound::Skeleton),
            ..BASE
        },
        Element::Bomb => Properties {
            sound: Some(Sound::Bomb),
            ..BASE
        },
        Element::BombTick(_) => Properties {
            explodes_by_hit: true,
            explosion_result: ExplosionKind::Bomb,
            ..BASE
        },
        Element::Inbox => EXIT,
        Element::PrePlayer(_) => EXIT,
        Element::Player | Element::PlayerBomb | Element::PlayerPneumatic(_) => PLAYER,
        Element::PneumaticActive(_) => Properties {
            sound: Some(Sound::Pneumatic),
            ..BASE
        },
        Element::PreOutbox | Element::Outbox => EXIT,
        Element::PreInvisibleOutbox | Element::InvisibleOutbox => EXIT,
        Element::Voodoo => Properties {
            explodes_by_hit: true,
            blows_up_flies: true,
            ..BASE
        },
        Element::TimePenalty => STEEL,
        Element::Amoeba => Properties {
            blows_up_flies: true,
            sound: Some(Sound::Amoeba),
            ..BASE
        },
        Element::Amoeba2 => Properties {
            blows_up_flies: true,
            explodes_by_hit: true,
            explosion_result: ExplosionKind::Diamond,
            sound: Some(Sound::Amoeba),
            ..BASE
        },
        Element::Slime => Properties {
            sound: Some(Sound::Slime),
            ..BASE
        },
        Element::Acid => Properties {
            sound: Some(Sound::Acid),
            ..BASE
        },
        Element::Water => Properties {
            sound: Some(Sound::Water),
            ..BASE
        },
        Element::Creature(kind, _) => creature(kind),
        Element::CowEnclosed(_) => creature(CreatureKind::Cow),
        Element::Bladder => Properties {
            pushable: true,
            slopes: Slopes::ALL,
            sound: Some(Sound::Bladder),
            ..BASE
        },
        Element::BladderSpender => BASE,
        Element::Replicator => Properties {
            sound: Some(Sound::Replicator),
            ..BASE
        },
        Element::ConveyorLeft | Element::ConveyorRight => BASE,
        Element::Teleporter => Properties {
            sound: Some(Sound::Teleporter),
            ..BASE
        },
        Element::GravitySwitch
        | Element::CreatureSwitch
        | Element::ExpandingWallSwitch
        | Element::BiterSwitch
        | Element::ReplicatorSwitch
        | Element::ConveyorSwitch
        | Element::ConveyorDirSwitch => SWITCH,
        Element::Explosion(kind, _) => Properties {
            explosion_result: kind,
            sound: Some(Sound::Explosion),
            ..BASE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dir4;

    #[test]
    fn test_table_is_complete() {
        // every element gets a lookup without panicking, and only explodable
        // elements have a meaningful hit result
        for e in Element::all() {
            let p = e.properties();
            assert!(!(p.can_fall && p.falling), "{:?}", e);
        }
    }

    #[test]
    fn test_classic_flags() {
        assert!(Element::Dirt.properties().diggable);
        assert!(Element::Space.properties().amoeba_consumes);
        assert!(!Element::Steel.properties().explodable);
        assert!(Element::Brick.properties().explodable);
        assert!(Element::Stone.properties().pushable);
        assert!(!Element::StoneFalling.properties().pushable);
        assert!(Element::Player.properties().explodes_by_hit);
        assert!(Element::Diamond.properties().counts_as_diamond);
        assert_eq!(
            Element::Creature(CreatureKind::Butterfly, Dir4::Down)
                .properties()
                .explosion_result,
            ExplosionKind::Diamond
        );
    }

    #[test]
    fn test_sloped_sides() {
        let p = Element::BrickSloped(Slope::UpLeft).properties();
        assert!(p.slopes.toward(Direction::Up));
        assert!(p.slopes.toward(Direction::Left));
        assert!(!p.slopes.toward(Direction::Right));
        assert!(!Element::BrickNonSliding
            .properties()
            .slopes
            .toward(Direction::Up));
    }
}
