use std::io;
use thiserror::Error;

/// Faults raised by the machine itself. The architecture defines none of
/// these; we report them instead of reading or writing past the end of
/// memory or the stack. A faulting instruction changes nothing except the
/// program counter, which was already advanced by the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("memory access of {len} byte(s) at 0x{addr:04x} is outside the address space")]
    AddressOutOfRange { addr: usize, len: usize },

    #[error("call stack overflow at pc 0x{pc:04x}")]
    StackOverflow { pc: u16 },

    #[error("return with empty call stack at pc 0x{pc:04x}")]
    StackUnderflow { pc: u16 },

    #[error("key 0x{key:02x} does not exist")]
    KeyOutOfRange { key: u8 },
}

/// Host-level errors: loading, presentation, audio, and machine faults.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("machine fault: {0}")]
    Fault(#[from] Fault),

    #[error("program is {len} bytes but only {max} fit above 0x200")]
    ProgramTooLarge { len: usize, max: usize },

    #[error("display wants {want} bytes per frame, the framebuffer has {got}")]
    DisplaySize { want: usize, got: usize },

    #[error("audio: {0}")]
    Sound(String),
}
