//! The pseudo random generator of the original C64 Boulder Dash.
//!
//! Caves imported from the 8-bit games carry seeds for this generator, and the
//! random fill of those caves only comes out right when the generator is
//! reproduced bit for bit, including the carry propagation of the 6502 `ADC`
//! and `ROR` instructions it was written with.

use serde::{Deserialize, Serialize};

/// State of the generator: two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct C64Random {
    seed_1: u8,
    seed_2: u8,
}

impl Default for C64Random {
    fn default() -> Self {
        C64Random::new(0, 0)
    }
}

impl C64Random {
    /// a generator with the given seed bytes
    pub const fn new(seed_1: u8, seed_2: u8) -> Self {
        C64Random { seed_1, seed_2 }
    }

    /// the way caves seed the generator: first byte zero, second byte the cave seed
    pub const fn from_cave_seed(seed: u8) -> Self {
        C64Random::new(0, seed)
    }

    /// the current seed bytes
    pub fn seeds(&self) -> (u8, u8) {
        (self.seed_1, self.seed_2)
    }

    /// Computes the successor state and the byte it produces, without
    /// touching `self`.
    pub fn step(self) -> (C64Random, u8) {
        let seed_1 = self.seed_1 as u32;
        let seed_2 = self.seed_2 as u32;

        let temp_1 = (seed_1 & 0x01) << 7;
        let temp_2 = (seed_2 >> 1) & 0x7f;

        let mut result = seed_2 + ((seed_2 & 0x01) << 7);
        let mut carry = result >> 8;
        result &= 0xff;
        result = result + carry + 0x13;
        carry = result >> 8;
        let new_seed_2 = result & 0xff;

        result = seed_1 + carry + temp_1;
        carry = result >> 8;
        result &= 0xff;
        result = result + carry + temp_2;
        let new_seed_1 = result & 0xff;

        let next = C64Random::new(new_seed_1 as u8, new_seed_2 as u8);
        (next, next.seed_1)
    }

    /// advances the generator and returns the next byte
    pub fn next_byte(&mut self) -> u8 {
        let (next, byte) = self.step();
        *self = next;
        byte
    }
}

impl Iterator for C64Random {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_byte())
    }
}
