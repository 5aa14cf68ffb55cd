use crate::types::{Coordinate, Direction};
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// How positions outside the map are brought back inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    /// there is nothing outside, reads give the map's border
    Closed,
    /// left and right edges are joined, so are top and bottom
    Torus,
    /// the map is one long line: leaving on the right enters the next row on
    /// the left, leaving at the bottom enters at the top
    LineShift,
}

/// A rectangular grid of values, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaveMap<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T: Clone> CaveMap<T> {
    /// a map with every cell set to `value`. Negative sizes give an empty map.
    pub fn new(width: i32, height: i32, value: T) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        CaveMap {
            width,
            height,
            cells: vec![value; width as usize * height as usize],
        }
    }

    /// sets every cell to `value`
    pub fn fill(&mut self, value: T) {
        for cell in self.cells.iter_mut() {
            *cell = value.clone();
        }
    }

    /// the value at `pos`, positions outside the map give `None`
    pub fn get_cloned(&self, pos: Coordinate) -> Option<T> {
        self.get(pos).cloned()
    }
}

impl<T> CaveMap<T> {
    /// builds a map from rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as i32;
        if rows.iter().any(|r| r.len() as i32 != width) {
            return None;
        }
        Some(CaveMap {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// a map where each cell is computed from its position
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(Coordinate) -> T) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = iproduct!(0..height, 0..width)
            .map(|(y, x)| f(Coordinate::new(x, y)))
            .collect();
        CaveMap {
            width,
            height,
            cells,
        }
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// is the position inside the map
    pub fn contains(&self, pos: Coordinate) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Coordinate) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    #[allow(missing_docs)]
    pub fn get(&self, pos: Coordinate) -> Option<&T> {
        self.index(pos).map(|i| &self.cells[i])
    }

    #[allow(missing_docs)]
    pub fn get_mut(&mut self, pos: Coordinate) -> Option<&mut T> {
        match self.index(pos) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    /// Stores `value` at `pos`. Returns false, leaving the map untouched, when
    /// the position is outside.
    pub fn set(&mut self, pos: Coordinate, value: T) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Brings a position back inside the map according to `mode`. `Closed`
    /// maps return `None` for positions outside.
    pub fn wrap(&self, pos: Coordinate, mode: WrapMode) -> Option<Coordinate> {
        if self.contains(pos) {
            return Some(pos);
        }
        if self.width == 0 || self.height == 0 {
            return None;
        }
        match mode {
            WrapMode::Closed => None,
            WrapMode::Torus => Some(Coordinate::new(
                pos.x.rem_euclid(self.width),
                pos.y.rem_euclid(self.height),
            )),
            WrapMode::LineShift => {
                let y = pos.y + pos.x.div_euclid(self.width);
                Some(Coordinate::new(
                    pos.x.rem_euclid(self.width),
                    y.rem_euclid(self.height),
                ))
            }
        }
    }

    /// the neighbour of `pos` in `dir`, wrapped
    pub fn neighbour(&self, pos: Coordinate, dir: Direction, mode: WrapMode) -> Option<Coordinate> {
        self.wrap(pos.step(dir), mode)
    }

    /// all positions in scan order: row by row from the top, left to right
    pub fn positions(&self) -> impl Iterator<Item = Coordinate> {
        let width = self.width;
        iproduct!(0..self.height, 0..width).map(|(y, x)| Coordinate::new(x, y))
    }

    /// all cells in scan order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// all cells in scan order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.cells.iter_mut()
    }

    /// the rows of the map, top first
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks panics on zero, an empty map has no rows anyway
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// a map of the same size with every cell transformed
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> CaveMap<U> {
        CaveMap {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}
