//! Pressed/released state for the 16 logical keys.
//!
//! The host maps physical input events onto key indices 0x0..=0xF and
//! updates this state before each step; the engine only reads it.

pub const NUM_KEYS: usize = 16;

/// The key-state vector, one flag per logical key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    /// Mark a key as pressed. Key indices are taken modulo 16.
    pub fn press(&mut self, key: u8) {
        self.keys[key as usize % NUM_KEYS] = true;
    }

    /// Mark a key as released.
    pub fn release(&mut self, key: u8) {
        self.keys[key as usize % NUM_KEYS] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[key as usize % NUM_KEYS]
    }

    /// The lowest-numbered key that is currently pressed, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|i| i as u8)
    }

    pub fn clear(&mut self) {
        self.keys = [false; NUM_KEYS];
    }
}
