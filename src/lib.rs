/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

# Frontend

To try the emulator on a real program, there is a ready-to-use crossterm
frontend you can run with `cargo run --release -- <program>`. The keys
`1234 qwer asdf zxcv` map onto the 16 logical keys, but which ones matter
depends on the program.

# Library

The emulator owns all machine state. The host loads a program image,
drives execution by calling [`emulator::Emulator::step`] at whatever rate
it likes, feeds key presses in through the keypad, and reads the
framebuffer back out to render it.

```rust
use chip8_vm::emulator::Emulator;

let mut emulator = Emulator::with_seed(0);

// V0 := 42, then draw the font glyph for 0 at (0, 0).
emulator.load(&[0x60, 0x2A, 0xD0, 0x05]).unwrap();
emulator.step().unwrap();

assert!(!emulator.is_awaiting_key());
```

Errors are reported without corrupting machine state, so the host can
decide what to do with a bad instruction:

```rust
use chip8_vm::emulator::{Emulator, EmulatorError};

let mut emulator = Emulator::with_seed(0);
emulator.load(&[0xFF, 0xFF]).unwrap();

match emulator.step() {
    Err(EmulatorError::UnknownInstruction { word, .. }) => {
        // Halt, log, or step over it with `skip_instruction`.
        assert_eq!(0xFFFF, word);
    }
    _ => unreachable!(),
}
```

*/

pub mod emulator;
pub mod util;
