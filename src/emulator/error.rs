use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Load errors are retryable with another image. The rest are fatal to the
/// running program, but not to the host process; the host decides whether
/// to halt, skip over the instruction, or drop into single-stepping.
#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("program image is too large ({size} bytes, maximum is {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("failed to read program image")]
    ReadFailure(#[from] std::io::Error),

    #[error("unknown instruction {word:#06X} at {pc:#05X}")]
    UnknownInstruction { word: u16, pc: u16 },

    #[error("call stack overflow at {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("return with no active call at {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("address {address:#06X} is outside memory")]
    OutOfBoundsAddress { address: u16 },
}
