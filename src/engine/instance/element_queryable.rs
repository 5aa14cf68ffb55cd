use crate::{
    element::Element,
    types::{Coordinate, ElementQueryableCave},
};

use super::CaveInstance;

impl ElementQueryableCave for CaveInstance {
    fn element_at(&self, pos: Coordinate) -> Element {
        self.map
            .wrap(pos, self.wrap)
            .and_then(|pos| self.map.get(pos))
            .map(|cell| cell.element)
            .unwrap_or(Element::Steel)
    }

    fn count_elements(&self, pred: impl Fn(Element) -> bool) -> usize {
        self.map.iter().filter(|cell| pred(cell.element)).count()
    }
}
