//! Maze generation on a grid of cells, independent of how the maze is drawn.
use crate::c64_random::C64Random;
use crate::cave::MazeKind;

/// A maze: which neighbouring cells have a passage between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    /// passage from (x, y) to (x + 1, y)
    right: Vec<bool>,
    /// passage from (x, y) to (x, y + 1)
    down: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Left,
    Right,
    Up,
    Down,
}

impl Step {
    fn is_horizontal(self) -> bool {
        matches!(self, Step::Left | Step::Right)
    }
}

impl Maze {
    fn closed(width: usize, height: usize) -> Self {
        Maze {
            width,
            height,
            right: vec![false; width * height],
            down: vec![false; width * height],
        }
    }

    /// generates a maze of the given kind
    pub fn generate(
        kind: MazeKind,
        width: usize,
        height: usize,
        horizontal_percent: u8,
        rng: &mut C64Random,
    ) -> Maze {
        match kind {
            MazeKind::Perfect => Maze::perfect(width, height, horizontal_percent, rng),
            MazeKind::Braid => {
                let mut maze = Maze::perfect(width, height, horizontal_percent, rng);
                maze.braid(rng);
                maze
            }
            MazeKind::Unicursal => {
                Maze::perfect(width / 2, height / 2, horizontal_percent, rng).unicursal()
            }
        }
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// is there a passage from (x, y) to (x + 1, y)
    pub fn open_right(&self, x: usize, y: usize) -> bool {
        x + 1 < self.width && self.right[self.index(x, y)]
    }

    /// is there a passage from (x, y) to (x, y + 1)
    pub fn open_down(&self, x: usize, y: usize) -> bool {
        y + 1 < self.height && self.down[self.index(x, y)]
    }

    fn neighbour(&self, x: usize, y: usize, step: Step) -> Option<(usize, usize)> {
        match step {
            Step::Left if x > 0 => Some((x - 1, y)),
            Step::Right if x + 1 < self.width => Some((x + 1, y)),
            Step::Up if y > 0 => Some((x, y - 1)),
            Step::Down if y + 1 < self.height => Some((x, y + 1)),
            _ => None,
        }
    }

    fn open(&mut self, x: usize, y: usize, step: Step) {
        match step {
            Step::Left => {
                let i = self.index(x - 1, y);
                self.right[i] = true;
            }
            Step::Right => {
                let i = self.index(x, y);
                self.right[i] = true;
            }
            Step::Up => {
                let i = self.index(x, y - 1);
                self.down[i] = true;
            }
            Step::Down => {
                let i = self.index(x, y);
                self.down[i] = true;
            }
        }
    }

    fn is_open(&self, x: usize, y: usize, step: Step) -> bool {
        match step {
            Step::Left => x > 0 && self.open_right(x - 1, y),
            Step::Right => self.open_right(x, y),
            Step::Up => y > 0 && self.open_down(x, y - 1),
            Step::Down => self.open_down(x, y),
        }
    }

    fn passages(&self, x: usize, y: usize) -> usize {
        [Step::Left, Step::Right, Step::Up, Step::Down]
            .iter()
            .filter(|s| self.is_open(x, y, **s))
            .count()
    }

    fn pick(candidates: &[Step], horizontal_percent: u8, rng: &mut C64Random) -> Step {
        let horizontal: Vec<Step> = candidates.iter().copied().filter(|s| s.is_horizontal()).collect();
        let vertical: Vec<Step> = candidates.iter().copied().filter(|s| !s.is_horizontal()).collect();
        let pool = if horizontal.is_empty() {
            vertical
        } else if vertical.is_empty() {
            horizontal
        } else if (rng.next_byte() as u32 * 100 / 256) < horizontal_percent as u32 {
            horizontal
        } else {
            vertical
        };
        pool[rng.next_byte() as usize % pool.len()]
    }

    /// randomized depth first search from the top left cell
    fn perfect(width: usize, height: usize, horizontal_percent: u8, rng: &mut C64Random) -> Maze {
        let mut maze = Maze::closed(width, height);
        if width == 0 || height == 0 {
            return maze;
        }
        let mut visited = vec![false; width * height];
        let mut stack = vec![(0usize, 0usize)];
        visited[0] = true;
        while let Some(&(x, y)) = stack.last() {
            let candidates: Vec<Step> = [Step::Left, Step::Right, Step::Up, Step::Down]
                .iter()
                .copied()
                .filter(|s| match maze.neighbour(x, y, *s) {
                    Some((nx, ny)) => !visited[maze.index(nx, ny)],
                    None => false,
                })
                .collect();
            if candidates.is_empty() {
                stack.pop();
                continue;
            }
            let step = Maze::pick(&candidates, horizontal_percent, rng);
            if let Some((nx, ny)) = maze.neighbour(x, y, step) {
                maze.open(x, y, step);
                let i = maze.index(nx, ny);
                visited[i] = true;
                stack.push((nx, ny));
            }
        }
        maze
    }

    /// opens a wall at every dead end, so every path leads somewhere
    fn braid(&mut self, rng: &mut C64Random) {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.passages(x, y) != 1 {
                    continue;
                }
                let closed: Vec<Step> = [Step::Left, Step::Right, Step::Up, Step::Down]
                    .iter()
                    .copied()
                    .filter(|s| self.neighbour(x, y, *s).is_some() && !self.is_open(x, y, *s))
                    .collect();
                if closed.is_empty() {
                    continue;
                }
                // joining two dead ends fixes both of them
                let dead_end_neighbours: Vec<Step> = closed
                    .iter()
                    .copied()
                    .filter(|s| match self.neighbour(x, y, *s) {
                        Some((nx, ny)) => self.passages(nx, ny) == 1,
                        None => false,
                    })
                    .collect();
                let pool = if dead_end_neighbours.is_empty() {
                    closed
                } else {
                    dead_end_neighbours
                };
                let step = pool[rng.next_byte() as usize % pool.len()];
                self.open(x, y, step);
            }
        }
    }

    /// Doubles every cell in to a 2x2 block and connects the blocks so that
    /// the result is a single path following the walls of this maze.
    fn unicursal(&self) -> Maze {
        let mut big = Maze::closed(self.width * 2, self.height * 2);
        for y in 0..self.height {
            for x in 0..self.width {
                let (bx, by) = (x * 2, y * 2);
                let up = self.is_open(x, y, Step::Up);
                let down = self.is_open(x, y, Step::Down);
                let left = self.is_open(x, y, Step::Left);
                let right = self.is_open(x, y, Step::Right);
                if !up {
                    big.open(bx, by, Step::Right);
                }
                if !down {
                    big.open(bx, by + 1, Step::Right);
                }
                if !left {
                    big.open(bx, by, Step::Down);
                }
                if !right {
                    big.open(bx + 1, by, Step::Down);
                }
                if right {
                    big.open(bx + 1, by, Step::Right);
                    big.open(bx + 1, by + 1, Step::Right);
                }
                if down {
                    big.open(bx, by + 1, Step::Down);
                    big.open(bx + 1, by + 1, Step::Down);
                }
            }
        }
        big
    }
}
