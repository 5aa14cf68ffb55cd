//! Adler-32 style checksums of baked caves.
//!
//! Highscore files are named after the checksum of their caveset, so the
//! value only depends on the layout of the caves: element codes, never how
//! a theme draws them.
use crate::engine::CaveInstance;
use crate::types::SizeDeterminableCave;

const MOD_ADLER: u32 = 65521;

/// A running checksum. Feed it values, then read it with [Adler32::finish].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Adler32::new()
    }
}

impl Adler32 {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Adler32 { a: 1, b: 0 }
    }

    /// adds one value
    pub fn update(&mut self, value: u16) {
        self.a = (self.a + value as u32) % MOD_ADLER;
        self.b = (self.b + self.a) % MOD_ADLER;
    }

    /// adds the size and every cell of an instance, row by row
    pub fn update_instance(&mut self, instance: &CaveInstance) {
        self.update(instance.get_width() as u16);
        self.update(instance.get_height() as u16);
        for cell in instance.cells().iter() {
            self.update(cell.element.code());
        }
    }

    #[allow(missing_docs)]
    pub fn finish(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// the checksum of a single instance
pub fn checksum(instance: &CaveInstance) -> u32 {
    let mut adler = Adler32::new();
    adler.update_instance(instance);
    adler.finish()
}
