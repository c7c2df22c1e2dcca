//! The machine state and the fetch/decode/execute engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::emulator::display::Display;
use crate::emulator::error::EmulatorError;
use crate::emulator::instruction::*;
use crate::emulator::keypad::Keypad;
use crate::util::word::Word;

const MEM_SIZE: usize = 4096;
const NUM_REGISTERS: usize = 16;
const STACK_SIZE: usize = 16;
const PC_START: u16 = 0x200;
const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PC_START as usize;
const GLYPH_SIZE: u16 = 5;
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// How the delay and sound timers are driven.
///
/// Historical implementations disagree on this: some decrement once per
/// executed instruction, others on a fixed ~60 Hz clock independent of the
/// instruction rate. Both behaviors are supported; `PerStep` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPolicy {
    /// Decrement both timers once per executed step.
    PerStep,
    /// Never decrement from within `step`; the host calls
    /// [`Emulator::tick_timers`] on its own schedule.
    External,
}

/// The virtual machine: registers, memory, stack, timers, framebuffer and
/// key state, plus the engine that mutates them one instruction at a time.
pub struct Emulator {
    memory: [u8; MEM_SIZE],
    registers: [u8; NUM_REGISTERS],
    delay_timer: u8,
    sound_timer: u8,
    i: u16,
    program_counter: u16,
    stack_pointer: u8,
    stack: [u16; STACK_SIZE],
    display: Display,
    keypad: Keypad,
    awaiting_key: Option<Reg>,
    rng: StdRng,
    timer_policy: TimerPolicy,
    debug: bool,
}

impl Emulator {
    /// Create an emulator with an entropy-seeded random source.
    pub fn new() -> Emulator {
        Emulator::with_rng(StdRng::from_entropy())
    }

    /// Create an emulator with a fixed random seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Emulator {
        Emulator::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Emulator {
        let mut emulator = Emulator {
            memory: [0; MEM_SIZE],
            registers: [0; NUM_REGISTERS],
            delay_timer: 0,
            sound_timer: 0,
            i: 0,
            program_counter: PC_START,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],
            display: Display::new(),
            keypad: Keypad::new(),
            awaiting_key: None,
            rng,
            timer_policy: TimerPolicy::PerStep,
            debug: false,
        };
        emulator.reset();
        emulator
    }

    /// Restart execution from a well-defined initial configuration.
    ///
    /// Clears the framebuffer, registers, timers, stack, index register and
    /// key state, rewrites the font glyphs into reserved memory, and sets
    /// the program counter back to the program start. The program region is
    /// left untouched, so the loaded image can be re-run without reloading.
    pub fn reset(&mut self) {
        self.registers = [0; NUM_REGISTERS];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.i = 0;
        self.program_counter = PC_START;
        self.stack_pointer = 0;
        self.stack = [0; STACK_SIZE];
        self.display.clear();
        self.keypad.clear();
        self.awaiting_key = None;
        for byte in self.memory[..PC_START as usize].iter_mut() {
            *byte = 0;
        }
        self.memory[..FONT.len()].copy_from_slice(&FONT);
    }

    /// Copy a program image into memory at the program start address.
    ///
    /// Fails with [`EmulatorError::ImageTooLarge`] without touching memory
    /// if the image does not fit.
    pub fn load(&mut self, program: &[u8]) -> Result<(), EmulatorError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(EmulatorError::ImageTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PC_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        log::info!("Loaded program of {} bytes", program.len());
        Ok(())
    }

    /// Read a program image from `source` and load it.
    pub fn load_from<R: std::io::Read>(&mut self, mut source: R) -> Result<(), EmulatorError> {
        let mut program = Vec::new();
        source.read_to_end(&mut program)?;
        self.load(&program)
    }

    pub fn set_timer_policy(&mut self, policy: TimerPolicy) {
        self.timer_policy = policy;
    }

    /// Toggle per-step tracing of the program counter and instruction word.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// The host's handle for reporting key presses and releases.
    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// Whether the engine is suspended on a wait-for-key instruction.
    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    /// Nonzero means a beep should be playing; producing sound is up to
    /// the host.
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Decrement both timers, saturating at zero.
    ///
    /// Called automatically under [`TimerPolicy::PerStep`]; with
    /// [`TimerPolicy::External`] the host calls this at ~60 Hz.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Advance past the current instruction without executing it.
    ///
    /// Intended as the host's "skip" policy after an
    /// [`EmulatorError::UnknownInstruction`].
    pub fn skip_instruction(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2);
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// If a previous step executed a wait-for-key instruction, this instead
    /// checks the keypad: with no key down it returns immediately without
    /// advancing, otherwise it captures the key and resumes. On error no
    /// state has been mutated, and the host decides how to proceed.
    pub fn step(&mut self) -> Result<(), EmulatorError> {
        if let Some(Reg(x)) = self.awaiting_key {
            let key = match self.keypad.first_pressed() {
                Some(key) => key,
                None => return Ok(()), // Still suspended
            };
            self.registers[x as usize] = key;
            self.awaiting_key = None;
            self.program_counter = self.program_counter.wrapping_add(2);
        } else {
            let word = self.fetch()?;
            let instruction =
                Instruction::decode(word).ok_or(EmulatorError::UnknownInstruction {
                    word: word.as_u16(),
                    pc: self.program_counter,
                })?;
            if self.debug {
                log::debug!(
                    "pc={:#05X} word={:#06X} {:?}",
                    self.program_counter,
                    word.as_u16(),
                    instruction
                );
            }
            log::trace!("{:?}", instruction);
            self.execute(instruction)?;
        }
        if let TimerPolicy::PerStep = self.timer_policy {
            self.tick_timers();
        }
        Ok(())
    }

    /// Read the two instruction bytes at the program counter.
    fn fetch(&self) -> Result<Word, EmulatorError> {
        let pc = self.program_counter as usize;
        if pc + 1 >= MEM_SIZE {
            return Err(EmulatorError::OutOfBoundsAddress {
                address: self.program_counter,
            });
        }
        Ok(Word::from_bytes(self.memory[pc], self.memory[pc + 1]))
    }

    /// Apply one instruction's effects.
    ///
    /// Fallible instructions validate before mutating anything, so an error
    /// leaves the machine in its previous state. The program counter is
    /// advanced by two unless the instruction sets it itself; skips advance
    /// by four when their condition holds.
    fn execute(&mut self, instruction: Instruction) -> Result<(), EmulatorError> {
        let mut pc = self.program_counter.wrapping_add(2);
        match instruction {
            Instruction::ClearScreen => self.display.clear(),

            Instruction::Return => {
                if self.stack_pointer == 0 {
                    return Err(EmulatorError::StackUnderflow {
                        pc: self.program_counter,
                    });
                }
                self.stack_pointer -= 1;
                pc = self.stack[self.stack_pointer as usize];
            }

            Instruction::Jump(Addr(addr)) => pc = addr,

            Instruction::Call(Addr(addr)) => {
                if self.stack_pointer as usize == STACK_SIZE {
                    return Err(EmulatorError::StackOverflow {
                        pc: self.program_counter,
                    });
                }
                self.stack[self.stack_pointer as usize] = pc;
                self.stack_pointer += 1;
                pc = addr;
            }

            Instruction::SkipEqImm(Reg(x), Imm(n)) => {
                if self.registers[x as usize] == n {
                    pc += 2;
                }
            }

            Instruction::SkipNeImm(Reg(x), Imm(n)) => {
                if self.registers[x as usize] != n {
                    pc += 2;
                }
            }

            Instruction::SkipEqReg(Reg(x), Reg(y)) => {
                if self.registers[x as usize] == self.registers[y as usize] {
                    pc += 2;
                }
            }

            Instruction::LoadImm(Reg(x), Imm(n)) => self.registers[x as usize] = n,

            // 8-bit wraparound, no flag
            Instruction::AddImm(Reg(x), Imm(n)) => {
                self.registers[x as usize] = self.registers[x as usize].wrapping_add(n);
            }

            Instruction::Copy(Reg(x), Reg(y)) => {
                self.registers[x as usize] = self.registers[y as usize];
            }

            Instruction::Or(Reg(x), Reg(y)) => {
                self.registers[x as usize] |= self.registers[y as usize];
            }

            Instruction::And(Reg(x), Reg(y)) => {
                self.registers[x as usize] &= self.registers[y as usize];
            }

            Instruction::Xor(Reg(x), Reg(y)) => {
                self.registers[x as usize] ^= self.registers[y as usize];
            }

            Instruction::AddReg(Reg(x), Reg(y)) => {
                let (sum, carried) =
                    self.registers[x as usize].overflowing_add(self.registers[y as usize]);
                self.registers[x as usize] = sum;
                self.registers[0xF] = carried as u8;
            }

            // The flag is 1 when no borrow occurs, i.e. minuend >= subtrahend.
            Instruction::SubReg(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.registers[x as usize], self.registers[y as usize]);
                self.registers[x as usize] = vx.wrapping_sub(vy);
                self.registers[0xF] = (vx >= vy) as u8;
            }

            Instruction::ShiftRight(Reg(x)) => {
                let vx = self.registers[x as usize];
                self.registers[x as usize] = vx >> 1;
                self.registers[0xF] = vx & 1;
            }

            Instruction::SubFrom(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.registers[x as usize], self.registers[y as usize]);
                self.registers[x as usize] = vy.wrapping_sub(vx);
                self.registers[0xF] = (vy >= vx) as u8;
            }

            Instruction::ShiftLeft(Reg(x)) => {
                let vx = self.registers[x as usize];
                self.registers[x as usize] = vx << 1;
                self.registers[0xF] = vx >> 7;
            }

            Instruction::SkipNeReg(Reg(x), Reg(y)) => {
                if self.registers[x as usize] != self.registers[y as usize] {
                    pc += 2;
                }
            }

            Instruction::LoadIndex(Addr(addr)) => self.i = addr,

            Instruction::JumpOffset(Addr(addr)) => {
                pc = addr.wrapping_add(self.registers[0] as u16);
            }

            Instruction::Random(Reg(x), Imm(n)) => {
                self.registers[x as usize] = self.rng.gen::<u8>() & n;
            }

            Instruction::Draw(Reg(x), Reg(y), height) => {
                let start = self.i as usize;
                let end = start + height as usize;
                if end > MEM_SIZE {
                    return Err(EmulatorError::OutOfBoundsAddress { address: self.i });
                }
                let sprite = &self.memory[start..end];
                let column = self.registers[x as usize] as usize;
                let row = self.registers[y as usize] as usize;
                self.registers[0xF] = self.display.blit(column, row, sprite);
            }

            Instruction::SkipKeyPressed(Reg(x)) => {
                if self.keypad.is_pressed(self.registers[x as usize]) {
                    pc += 2;
                }
            }

            Instruction::SkipKeyNotPressed(Reg(x)) => {
                if !self.keypad.is_pressed(self.registers[x as usize]) {
                    pc += 2;
                }
            }

            Instruction::ReadDelay(Reg(x)) => self.registers[x as usize] = self.delay_timer,

            // Suspend: leave the program counter in place and let `step`
            // resolve the wait once the host reports a key press.
            Instruction::WaitKey(reg) => {
                self.awaiting_key = Some(reg);
                pc = self.program_counter;
            }

            Instruction::SetDelay(Reg(x)) => self.delay_timer = self.registers[x as usize],

            Instruction::SetSound(Reg(x)) => self.sound_timer = self.registers[x as usize],

            Instruction::AddIndex(Reg(x)) => {
                self.i = self.i.wrapping_add(self.registers[x as usize] as u16);
            }

            // Each glyph is 5 bytes, starting at address 0.
            Instruction::LoadGlyph(Reg(x)) => {
                self.i = GLYPH_SIZE * (self.registers[x as usize] & 0xF) as u16;
            }

            Instruction::StoreBcd(Reg(x)) => {
                let addr = self.i as usize;
                if addr + 3 > MEM_SIZE {
                    return Err(EmulatorError::OutOfBoundsAddress { address: self.i });
                }
                let value = self.registers[x as usize];
                self.memory[addr] = value / 100;
                self.memory[addr + 1] = (value / 10) % 10;
                self.memory[addr + 2] = value % 10;
            }

            Instruction::StoreRegs(Reg(x)) => {
                let count = x as usize + 1;
                let start = self.i as usize;
                if start + count > MEM_SIZE {
                    return Err(EmulatorError::OutOfBoundsAddress { address: self.i });
                }
                self.memory[start..start + count].copy_from_slice(&self.registers[..count]);
                self.i = self.i.wrapping_add(count as u16);
            }

            Instruction::LoadRegs(Reg(x)) => {
                let count = x as usize + 1;
                let start = self.i as usize;
                if start + count > MEM_SIZE {
                    return Err(EmulatorError::OutOfBoundsAddress { address: self.i });
                }
                self.registers[..count].copy_from_slice(&self.memory[start..start + count]);
                self.i = self.i.wrapping_add(count as u16);
            }
        }
        self.program_counter = pc;
        Ok(())
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
