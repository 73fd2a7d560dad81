//! 8-bit add/subtract with carry-out.
//!
//! Subtraction is addition of the one's complement with a carry-in of one,
//! so the carry out of a subtraction is the *no borrow* flag: 1 when
//! `dest >= operand`, 0 when the result wrapped below zero.

/// Result of an ALU operation: the byte written back and the carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub carry: bool,
}

impl AluResult {
    /// carry as the value written to VF
    pub fn flag(&self) -> u8 {
        self.carry as u8
    }
}

/// `dest + operand` or `dest - operand`, modulo 256, with carry out
pub fn add_with_carry(dest: u8, operand: u8, subtract: bool) -> AluResult {
    let (operand, carry_in) = if subtract {
        (!operand, 1u16)
    } else {
        (operand, 0u16)
    };
    let sum = dest as u16 + operand as u16 + carry_in;
    AluResult {
        value: sum as u8,
        carry: sum > 0xff,
    }
}

pub fn add(dest: u8, operand: u8) -> AluResult {
    add_with_carry(dest, operand, false)
}

pub fn sub(dest: u8, operand: u8) -> AluResult {
    add_with_carry(dest, operand, true)
}
