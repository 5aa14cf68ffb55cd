use crate::types::SizeDeterminableCave;

use super::CaveInstance;

impl SizeDeterminableCave for CaveInstance {
    fn get_width(&self) -> u32 {
        self.map.width() as u32
    }

    fn get_height(&self) -> u32 {
        self.map.height() as u32
    }
}
