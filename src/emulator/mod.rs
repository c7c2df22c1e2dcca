//! The virtual machine itself: machine state, instruction decoding,
//! the framebuffer and keypad, and the error taxonomy.

pub mod display;
pub mod emulator;
pub mod error;
pub mod instruction;
pub mod keypad;

pub use self::emulator::{Emulator, TimerPolicy};
pub use self::error::EmulatorError;
