//! Drawing the objects of a template on to a map.
use super::maze::Maze;
use crate::c64_random::C64Random;
use crate::cave::{CaveMap, CaveObject, FillEntry, MazeKind, WrapMode};
use crate::element::Element;
use crate::types::{Coordinate, Direction, Level, Vector};
use fxhash::FxHashSet;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use tracing::trace;

/// A map being drawn on. Positions outside are clipped or wrapped.
#[derive(Debug)]
pub(crate) struct Canvas<'a> {
    map: &'a mut CaveMap<Element>,
    wrap: WrapMode,
}

/// Where the random bytes of a fill or maze come from.
#[derive(Debug)]
pub(crate) enum ByteSource<'a> {
    C64(C64Random),
    Stream(&'a mut ChaCha8Rng),
}

impl ByteSource<'_> {
    pub(crate) fn next_byte(&mut self) -> u8 {
        match self {
            ByteSource::C64(rng) => rng.next_byte(),
            ByteSource::Stream(rng) => rng.gen(),
        }
    }
}

fn ordered(c1: Coordinate, c2: Coordinate) -> (Coordinate, Coordinate) {
    (
        Coordinate::new(c1.x.min(c2.x), c1.y.min(c2.y)),
        Coordinate::new(c1.x.max(c2.x), c1.y.max(c2.y)),
    )
}

/// Picks the element of one randomly filled cell. Later entries win, like
/// the C64 games compared the byte against every probability in turn.
pub(crate) fn pick_fill(byte: u8, initial: Element, entries: &[FillEntry]) -> Element {
    entries
        .iter()
        .fold(initial, |element, entry| if byte < entry.probability { entry.element } else { element })
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(map: &'a mut CaveMap<Element>, wrap: WrapMode) -> Self {
        Canvas { map, wrap }
    }

    pub(crate) fn put(&mut self, pos: Coordinate, element: Element) {
        if let Some(pos) = self.map.wrap(pos, self.wrap) {
            self.map.set(pos, element);
        }
    }

    fn get(&self, pos: Coordinate) -> Option<Element> {
        self.map.wrap(pos, self.wrap).and_then(|p| self.map.get_cloned(p))
    }

    /// Draws one object. `rng` is the run-time stream, used for seeds that
    /// are negative.
    pub(crate) fn draw(&mut self, object: &CaveObject, level: Level, rng: &mut ChaCha8Rng) {
        trace!(object = object.name(), "drawing");
        match object {
            CaveObject::Point { pos, element } => self.put(*pos, *element),
            CaveObject::Line { from, to, element } => self.line(*from, *to, *element),
            CaveObject::Rectangle {
                corner1,
                corner2,
                element,
            } => self.rectangle(*corner1, *corner2, *element),
            CaveObject::FilledRectangle {
                corner1,
                corner2,
                border,
                fill,
            } => {
                let (tl, br) = ordered(*corner1, *corner2);
                for y in tl.y..=br.y {
                    for x in tl.x..=br.x {
                        self.put(Coordinate::new(x, y), *fill);
                    }
                }
                self.rectangle(tl, br, *border);
            }
            CaveObject::Raster {
                corner1,
                corner2,
                step,
                element,
            } => self.raster(*corner1, *corner2, *step, *element),
            CaveObject::Join {
                offset,
                search,
                put,
                backwards,
            } => self.join(*offset, *search, *put, *backwards),
            CaveObject::FloodFillReplace {
                start,
                search,
                fill,
            } => self.flood_fill(*start, *fill, |e| e == *search),
            CaveObject::FloodFillBorder {
                start,
                border,
                fill,
            } => {
                let (border, fill) = (*border, *fill);
                self.flood_fill(*start, fill, |e| e != border && e != fill)
            }
            CaveObject::Maze {
                corner1,
                corner2,
                kind,
                wall_width,
                path_width,
                wall,
                path,
                horizontal_percent,
                seeds,
            } => {
                let seed = seeds[level.as_index()];
                let seed = if seed < 0 { rng.gen_range(0..=0xffff) } else { seed };
                let mut maze_rng = C64Random::new((seed >> 8) as u8, seed as u8);
                self.maze(
                    *corner1,
                    *corner2,
                    *kind,
                    (*wall_width, *path_width),
                    (*wall, *path),
                    *horizontal_percent,
                    &mut maze_rng,
                );
            }
            CaveObject::RandomFill {
                corner1,
                corner2,
                seeds,
                initial,
                entries,
                replace_only,
            } => {
                let seed = seeds[level.as_index()];
                let mut source = if seed < 0 {
                    ByteSource::Stream(rng)
                } else {
                    ByteSource::C64(C64Random::from_cave_seed(seed as u8))
                };
                let (tl, br) = ordered(*corner1, *corner2);
                for y in tl.y..=br.y {
                    for x in tl.x..=br.x {
                        let pos = Coordinate::new(x, y);
                        let byte = source.next_byte();
                        let element = pick_fill(byte, *initial, entries);
                        match replace_only {
                            Some(only) if self.get(pos) != Some(*only) => {}
                            _ => self.put(pos, element),
                        }
                    }
                }
            }
            CaveObject::CopyPaste {
                corner1,
                corner2,
                dest,
                mirror,
                flip,
            } => self.copy_paste(*corner1, *corner2, *dest, *mirror, *flip),
        }
    }

    fn line(&mut self, from: Coordinate, to: Coordinate, element: Element) {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        let mut pos = from;
        loop {
            self.put(pos, element);
            if pos == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                pos.x += sx;
            }
            if e2 <= dx {
                err += dx;
                pos.y += sy;
            }
        }
    }

    fn rectangle(&mut self, c1: Coordinate, c2: Coordinate, element: Element) {
        let (tl, br) = ordered(c1, c2);
        for x in tl.x..=br.x {
            self.put(Coordinate::new(x, tl.y), element);
            self.put(Coordinate::new(x, br.y), element);
        }
        for y in tl.y..=br.y {
            self.put(Coordinate::new(tl.x, y), element);
            self.put(Coordinate::new(br.x, y), element);
        }
    }

    fn raster(&mut self, c1: Coordinate, c2: Coordinate, step: Vector, element: Element) {
        let (tl, br) = ordered(c1, c2);
        // validated objects never have a zero step
        let (sx, sy) = (step.x.max(1) as usize, step.y.max(1) as usize);
        for y in (tl.y..=br.y).step_by(sy) {
            for x in (tl.x..=br.x).step_by(sx) {
                self.put(Coordinate::new(x, y), element);
            }
        }
    }

    /// Positions are treated as one long line here, so an offset leaving a
    /// row continues on the next one.
    fn join(&mut self, offset: Vector, search: Element, put: Element, backwards: bool) {
        let width = self.map.width();
        let total = width * self.map.height();
        if total == 0 {
            return;
        }
        let shift = offset.y * width + offset.x;
        let to_pos = |i: i32| Coordinate::new(i % width, i / width);
        let order: Box<dyn Iterator<Item = i32>> = if backwards {
            Box::new((0..total).rev())
        } else {
            Box::new(0..total)
        };
        for i in order {
            if self.map.get_cloned(to_pos(i)) == Some(search) {
                let target = i + shift;
                let target = if self.wrap == WrapMode::Closed {
                    if target < 0 || target >= total {
                        continue;
                    }
                    target
                } else {
                    target.rem_euclid(total)
                };
                self.map.set(to_pos(target), put);
            }
        }
    }

    fn flood_fill(&mut self, start: Coordinate, fill: Element, mut matches: impl FnMut(Element) -> bool) {
        match self.map.get_cloned(start) {
            Some(e) if matches(e) => {}
            _ => return,
        }
        let mut queue = VecDeque::new();
        let mut visited = FxHashSet::default();
        queue.push_back(start);
        visited.insert(start);
        while let Some(pos) = queue.pop_front() {
            self.map.set(pos, fill);
            for dir in Direction::MAIN.iter() {
                let next = pos.step(*dir);
                if visited.contains(&next) {
                    continue;
                }
                if let Some(e) = self.map.get_cloned(next) {
                    if matches(e) {
                        visited.insert(next);
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn maze(
        &mut self,
        c1: Coordinate,
        c2: Coordinate,
        kind: MazeKind,
        (wall_width, path_width): (i32, i32),
        (wall, path): (Element, Element),
        horizontal_percent: u8,
        rng: &mut C64Random,
    ) {
        let (tl, br) = ordered(c1, c2);
        let unit = wall_width + path_width;
        let cells_x = ((br.x - tl.x + 1 + wall_width) / unit).max(0) as usize;
        let cells_y = ((br.y - tl.y + 1 + wall_width) / unit).max(0) as usize;
        for y in tl.y..=br.y {
            for x in tl.x..=br.x {
                self.put(Coordinate::new(x, y), wall);
            }
        }
        let maze = Maze::generate(kind, cells_x, cells_y, horizontal_percent, rng);
        for cy in 0..maze.height() {
            for cx in 0..maze.width() {
                let corner = Coordinate::new(tl.x + cx as i32 * unit, tl.y + cy as i32 * unit);
                self.block(corner, path_width, path_width, path);
                if maze.open_right(cx, cy) {
                    let right = Coordinate::new(corner.x + path_width, corner.y);
                    self.block(right, wall_width, path_width, path);
                }
                if maze.open_down(cx, cy) {
                    let below = Coordinate::new(corner.x, corner.y + path_width);
                    self.block(below, path_width, wall_width, path);
                }
            }
        }
    }

    fn block(&mut self, corner: Coordinate, width: i32, height: i32, element: Element) {
        for y in corner.y..corner.y + height {
            for x in corner.x..corner.x + width {
                self.put(Coordinate::new(x, y), element);
            }
        }
    }

    fn copy_paste(&mut self, c1: Coordinate, c2: Coordinate, dest: Coordinate, mirror: bool, flip: bool) {
        let (tl, br) = ordered(c1, c2);
        let (w, h) = (br.x - tl.x + 1, br.y - tl.y + 1);
        let buffer = CaveMap::from_fn(w, h, |p| self.get(Coordinate::new(tl.x + p.x, tl.y + p.y)));
        for pos in buffer.positions() {
            let dx = if mirror { w - 1 - pos.x } else { pos.x };
            let dy = if flip { h - 1 - pos.y } else { pos.y };
            if let Some(Some(element)) = buffer.get_cloned(pos) {
                self.put(Coordinate::new(dest.x + dx, dest.y + dy), element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ascii(map: &CaveMap<Element>) -> Vec<String> {
        map.rows()
            .map(|r| r.iter().map(|e| e.to_char().unwrap_or('?')).collect())
            .collect()
    }

    fn draw_on(width: i32, height: i32, objects: &[CaveObject]) -> Vec<String> {
        let mut map = CaveMap::new(width, height, Element::Space);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut canvas = Canvas::new(&mut map, WrapMode::Closed);
        for o in objects {
            canvas.draw(o, Level::ONE, &mut rng);
        }
        ascii(&map)
    }

    #[test]
    fn test_line_diagonal() {
        let rows = draw_on(
            4,
            4,
            &[CaveObject::Line {
                from: Coordinate::new(0, 0),
                to: Coordinate::new(3, 3),
                element: Element::Brick,
            }],
        );
        assert_eq!(rows, vec!["w   ", " w  ", "  w ", "   w"]);
    }

    #[test]
    fn test_later_objects_overwrite() {
        let rows = draw_on(
            5,
            3,
            &[
                CaveObject::FilledRectangle {
                    corner1: Coordinate::new(4, 2),
                    corner2: Coordinate::new(0, 0),
                    border: Element::Steel,
                    fill: Element::Dirt,
                },
                CaveObject::Point {
                    pos: Coordinate::new(2, 1),
                    element: Element::Diamond,
                },
                CaveObject::Point {
                    pos: Coordinate::new(9, 9),
                    element: Element::Diamond,
                },
            ],
        );
        assert_eq!(rows, vec!["WWWWW", "W.d.W", "WWWWW"]);
    }

    #[test]
    fn test_raster() {
        let rows = draw_on(
            5,
            3,
            &[CaveObject::Raster {
                corner1: Coordinate::new(0, 0),
                corner2: Coordinate::new(4, 2),
                step: Vector { x: 2, y: 2 },
                element: Element::Stone,
            }],
        );
        assert_eq!(rows, vec!["r r r", "     ", "r r r"]);
    }

    #[test]
    fn test_join_wraps_to_next_row() {
        let rows = draw_on(
            3,
            2,
            &[
                CaveObject::Point {
                    pos: Coordinate::new(2, 0),
                    element: Element::Stone,
                },
                CaveObject::Join {
                    offset: Vector { x: 1, y: 0 },
                    search: Element::Stone,
                    put: Element::Diamond,
                    backwards: false,
                },
            ],
        );
        assert_eq!(rows, vec!["  r", "d  "]);
    }

    #[test]
    fn test_flood_fill_stops_at_border() {
        let mut map = CaveMap::new(5, 3, Element::Space);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut canvas = Canvas::new(&mut map, WrapMode::Closed);
        canvas.draw(
            &CaveObject::Line {
                from: Coordinate::new(2, 0),
                to: Coordinate::new(2, 2),
                element: Element::Brick,
            },
            Level::ONE,
            &mut rng,
        );
        canvas.draw(
            &CaveObject::FloodFillBorder {
                start: Coordinate::new(0, 1),
                border: Element::Brick,
                fill: Element::Dirt,
            },
            Level::ONE,
            &mut rng,
        );
        assert_eq!(ascii(&map), vec!["..w  ", "..w  ", "..w  "]);
    }

    #[test]
    fn test_copy_paste_mirrored() {
        let rows = draw_on(
            6,
            1,
            &[
                CaveObject::Point {
                    pos: Coordinate::new(0, 0),
                    element: Element::Stone,
                },
                CaveObject::Point {
                    pos: Coordinate::new(1, 0),
                    element: Element::Diamond,
                },
                CaveObject::CopyPaste {
                    corner1: Coordinate::new(0, 0),
                    corner2: Coordinate::new(2, 0),
                    dest: Coordinate::new(3, 0),
                    mirror: true,
                    flip: false,
                },
            ],
        );
        assert_eq!(rows, vec!["rd  dr"]);
    }

    #[test]
    fn test_maze_cells_and_pillars() {
        let rows = draw_on(
            7,
            7,
            &[CaveObject::Maze {
                corner1: Coordinate::new(0, 0),
                corner2: Coordinate::new(6, 6),
                kind: MazeKind::Perfect,
                wall_width: 1,
                path_width: 1,
                wall: Element::Brick,
                path: Element::Space,
                horizontal_percent: 50,
                seeds: [3; 5],
            }],
        );
        let at = |x: usize, y: usize| rows[y].chars().nth(x);
        // 4x4 cells on the even positions, pillars between them on the odd ones
        for y in (0..7).step_by(2) {
            for x in (0..7).step_by(2) {
                assert_eq!(at(x, y), Some(' '));
            }
        }
        for y in (1..7).step_by(2) {
            for x in (1..7).step_by(2) {
                assert_eq!(at(x, y), Some('w'));
            }
        }
        // a spanning tree of 16 cells has 15 passages
        let paths: usize = rows.iter().map(|r| r.matches(' ').count()).sum();
        assert_eq!(paths, 16 + 15);
    }

    #[test]
    fn test_random_fill_is_c64_exact() {
        // seed 0x0a gives bytes 05 93 6c cd ...
        let rows = draw_on(
            4,
            1,
            &[CaveObject::RandomFill {
                corner1: Coordinate::new(0, 0),
                corner2: Coordinate::new(3, 0),
                seeds: [0x0a; 5],
                initial: Element::Dirt,
                entries: vec![FillEntry {
                    element: Element::Stone,
                    probability: 0x70,
                }],
                replace_only: None,
            }],
        );
        assert_eq!(rows, vec!["r.r."]);
    }
}
