//! Decoding of 16-bit opcode words.
//!
//! The top nibble selects a family; families 0x0, 0x8, 0xE and 0xF are
//! sub-dispatched on the low byte (low nibble for 0x8). Other families
//! ignore the fields they don't use, e.g. 5xy1 is still 5xy0. Anything that
//! matches neither level decodes to `Unknown` and executes as a no-op.
use std::fmt;

/// The five operand fields of an opcode word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub word: u16,
}

impl Opcode {
    pub fn new(word: u16) -> Self {
        Opcode { word }
    }

    /// family selector
    pub fn family(&self) -> u8 {
        (self.word >> 12) as u8
    }

    pub fn x(&self) -> usize {
        ((self.word >> 8) & 0xf) as usize
    }

    pub fn y(&self) -> usize {
        ((self.word >> 4) & 0xf) as usize
    }

    pub fn n(&self) -> u8 {
        (self.word & 0xf) as u8
    }

    pub fn kk(&self) -> u8 {
        (self.word & 0xff) as u8
    }

    pub fn nnn(&self) -> u16 {
        self.word & 0x0fff
    }
}

/// One decoded instruction. `x`/`y` are register indices, `kk` a byte
/// literal, `n` a nibble literal, `nnn` a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: machine code routine; ignored
    Sys(u16),
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SeByte(usize, u8),
    /// 4xkk
    SneByte(usize, u8),
    /// 5xy0
    SeReg(usize, usize),
    /// 6xkk
    LdByte(usize, u8),
    /// 7xkk
    AddByte(usize, u8),
    /// 8xy0
    LdReg(usize, usize),
    /// 8xy1
    Or(usize, usize),
    /// 8xy2
    And(usize, usize),
    /// 8xy3
    Xor(usize, usize),
    /// 8xy4
    AddReg(usize, usize),
    /// 8xy5
    Sub(usize, usize),
    /// 8xy6
    Shr(usize, usize),
    /// 8xy7
    Subn(usize, usize),
    /// 8xyE
    Shl(usize, usize),
    /// 9xy0
    SneReg(usize, usize),
    /// Annn
    LdI(u16),
    /// Bnnn; `x` only matters for the SUPER-CHIP variant
    JpOffset(usize, u16),
    /// Cxkk
    Rnd(usize, u8),
    /// Dxyn
    Drw(usize, usize, u8),
    /// Ex9E
    Skp(usize),
    /// ExA1
    Sknp(usize),
    /// Fx07
    LdFromDelay(usize),
    /// Fx0A
    WaitKey(usize),
    /// Fx15
    LdDelay(usize),
    /// Fx18
    LdSound(usize),
    /// Fx1E
    AddI(usize),
    /// Fx29
    LdGlyph(usize),
    /// Fx33
    Bcd(usize),
    /// Fx55
    Dump(usize),
    /// Fx65
    Load(usize),
    Unknown(u16),
}

impl Instruction {
    pub fn decode(word: u16) -> Self {
        use Instruction::*;

        let op = Opcode::new(word);
        let (x, y, n, kk, nnn) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        match op.family() {
            0x0 => match kk {
                0xe0 => Cls,
                0xee => Ret,
                _ => Sys(nnn),
            },
            0x1 => Jp(nnn),
            0x2 => Call(nnn),
            0x3 => SeByte(x, kk),
            0x4 => SneByte(x, kk),
            0x5 => SeReg(x, y),
            0x6 => LdByte(x, kk),
            0x7 => AddByte(x, kk),
            0x8 => match n {
                0x0 => LdReg(x, y),
                0x1 => Or(x, y),
                0x2 => And(x, y),
                0x3 => Xor(x, y),
                0x4 => AddReg(x, y),
                0x5 => Sub(x, y),
                0x6 => Shr(x, y),
                0x7 => Subn(x, y),
                0xe => Shl(x, y),
                _ => Unknown(word),
            },
            0x9 => SneReg(x, y),
            0xa => LdI(nnn),
            0xb => JpOffset(x, nnn),
            0xc => Rnd(x, kk),
            0xd => Drw(x, y, n),
            0xe => match kk {
                0x9e => Skp(x),
                0xa1 => Sknp(x),
                _ => Unknown(word),
            },
            0xf => match kk {
                0x07 => LdFromDelay(x),
                0x0a => WaitKey(x),
                0x15 => LdDelay(x),
                0x18 => LdSound(x),
                0x1e => AddI(x),
                0x29 => LdGlyph(x),
                0x33 => Bcd(x),
                0x55 => Dump(x),
                0x65 => Load(x),
                _ => Unknown(word),
            },
            _ => Unknown(word),
        }
    }
}

/// conventional mnemonics, for tracing
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys(nnn) => write!(f, "SYS  0x{:03x}", nnn),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(nnn) => write!(f, "JP   0x{:03x}", nnn),
            Call(nnn) => write!(f, "CALL 0x{:03x}", nnn),
            SeByte(x, kk) => write!(f, "SE   V{:X}, 0x{:02x}", x, kk),
            SneByte(x, kk) => write!(f, "SNE  V{:X}, 0x{:02x}", x, kk),
            SeReg(x, y) => write!(f, "SE   V{:X}, V{:X}", x, y),
            LdByte(x, kk) => write!(f, "LD   V{:X}, 0x{:02x}", x, kk),
            AddByte(x, kk) => write!(f, "ADD  V{:X}, 0x{:02x}", x, kk),
            LdReg(x, y) => write!(f, "LD   V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR   V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND  V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR  V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD  V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB  V{:X}, V{:X}", x, y),
            Shr(x, y) => write!(f, "SHR  V{:X}, V{:X}", x, y),
            Subn(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl(x, y) => write!(f, "SHL  V{:X}, V{:X}", x, y),
            SneReg(x, y) => write!(f, "SNE  V{:X}, V{:X}", x, y),
            LdI(nnn) => write!(f, "LD   I, 0x{:03x}", nnn),
            JpOffset(_, nnn) => write!(f, "JP   V0, 0x{:03x}", nnn),
            Rnd(x, kk) => write!(f, "RND  V{:X}, 0x{:02x}", x, kk),
            Drw(x, y, n) => write!(f, "DRW  V{:X}, V{:X}, {}", x, y, n),
            Skp(x) => write!(f, "SKP  V{:X}", x),
            Sknp(x) => write!(f, "SKNP V{:X}", x),
            LdFromDelay(x) => write!(f, "LD   V{:X}, DT", x),
            WaitKey(x) => write!(f, "LD   V{:X}, K", x),
            LdDelay(x) => write!(f, "LD   DT, V{:X}", x),
            LdSound(x) => write!(f, "LD   ST, V{:X}", x),
            AddI(x) => write!(f, "ADD  I, V{:X}", x),
            LdGlyph(x) => write!(f, "LD   F, V{:X}", x),
            Bcd(x) => write!(f, "LD   B, V{:X}", x),
            Dump(x) => write!(f, "LD   [I], V{:X}", x),
            Load(x) => write!(f, "LD   V{:X}, [I]", x),
            Unknown(word) => write!(f, "DW   0x{:04x}", word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    #[test]
    fn test_fields() {
        let op = Opcode::new(0xd12a);
        assert_eq!(op.family(), 0xd);
        assert_eq!(op.x(), 0x1);
        assert_eq!(op.y(), 0x2);
        assert_eq!(op.n(), 0xa);
        assert_eq!(op.kk(), 0x2a);
        assert_eq!(op.nnn(), 0x12a);
    }

    #[test]
    fn test_decode_family_0() {
        assert_eq!(Instruction::decode(0x00e0), Cls);
        assert_eq!(Instruction::decode(0x00ee), Ret);
        assert_eq!(Instruction::decode(0x0123), Sys(0x123));
    }

    #[test]
    fn test_decode_flow() {
        assert_eq!(Instruction::decode(0x1200), Jp(0x200));
        assert_eq!(Instruction::decode(0x2abc), Call(0xabc));
        assert_eq!(Instruction::decode(0x3a42), SeByte(0xa, 0x42));
        assert_eq!(Instruction::decode(0x4a42), SneByte(0xa, 0x42));
        assert_eq!(Instruction::decode(0x5ab0), SeReg(0xa, 0xb));
        assert_eq!(Instruction::decode(0x9ab0), SneReg(0xa, 0xb));
        assert_eq!(Instruction::decode(0xb300), JpOffset(3, 0x300));
    }

    #[test]
    fn test_decode_family_8() {
        assert_eq!(Instruction::decode(0x8120), LdReg(1, 2));
        assert_eq!(Instruction::decode(0x8121), Or(1, 2));
        assert_eq!(Instruction::decode(0x8122), And(1, 2));
        assert_eq!(Instruction::decode(0x8123), Xor(1, 2));
        assert_eq!(Instruction::decode(0x8124), AddReg(1, 2));
        assert_eq!(Instruction::decode(0x8125), Sub(1, 2));
        assert_eq!(Instruction::decode(0x8126), Shr(1, 2));
        assert_eq!(Instruction::decode(0x8127), Subn(1, 2));
        assert_eq!(Instruction::decode(0x812e), Shl(1, 2));
        for n in [0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xf] {
            let word = 0x8120 | n;
            assert_eq!(Instruction::decode(word), Unknown(word));
        }
    }

    #[test]
    fn test_decode_family_e_and_f() {
        assert_eq!(Instruction::decode(0xe59e), Skp(5));
        assert_eq!(Instruction::decode(0xe5a1), Sknp(5));
        assert_eq!(Instruction::decode(0xe5a2), Unknown(0xe5a2));
        assert_eq!(Instruction::decode(0xf507), LdFromDelay(5));
        assert_eq!(Instruction::decode(0xf50a), WaitKey(5));
        assert_eq!(Instruction::decode(0xf515), LdDelay(5));
        assert_eq!(Instruction::decode(0xf518), LdSound(5));
        assert_eq!(Instruction::decode(0xf51e), AddI(5));
        assert_eq!(Instruction::decode(0xf529), LdGlyph(5));
        assert_eq!(Instruction::decode(0xf533), Bcd(5));
        assert_eq!(Instruction::decode(0xf555), Dump(5));
        assert_eq!(Instruction::decode(0xf565), Load(5));
        assert_eq!(Instruction::decode(0xf566), Unknown(0xf566));
    }

    #[test]
    fn test_decode_literals() {
        assert_eq!(Instruction::decode(0x6005), LdByte(0, 5));
        assert_eq!(Instruction::decode(0x7fff), AddByte(0xf, 0xff));
        assert_eq!(Instruction::decode(0xa050), LdI(0x050));
        assert_eq!(Instruction::decode(0xc30f), Rnd(3, 0x0f));
        assert_eq!(Instruction::decode(0xd125), Drw(1, 2, 5));
    }

    #[test]
    fn test_secondary_fields_ignored_outside_subfamilies() {
        // only the low byte selects within family 0; 5xyn/9xyn ignore n
        assert_eq!(Instruction::decode(0x03e0), Cls);
        assert_eq!(Instruction::decode(0x0fee), Ret);
        assert_eq!(Instruction::decode(0x5121), SeReg(1, 2));
        assert_eq!(Instruction::decode(0x912f), SneReg(1, 2));
    }

    #[test]
    fn test_every_word_decodes() {
        // decode is total; only the listed families produce Unknown
        for word in 0..=u16::MAX {
            if let Unknown(w) = Instruction::decode(word) {
                assert_eq!(w, word);
                assert!(matches!(w >> 12, 0x8 | 0xe | 0xf));
            }
        }
    }

    #[test]
    fn test_disassembly() {
        assert_eq!(Instruction::decode(0x00e0).to_string(), "CLS");
        assert_eq!(Instruction::decode(0x6a05).to_string(), "LD   VA, 0x05");
        assert_eq!(Instruction::decode(0xd125).to_string(), "DRW  V1, V2, 5");
        assert_eq!(Instruction::decode(0xf30a).to_string(), "LD   V3, K");
        assert_eq!(Instruction::decode(0xffff).to_string(), "DW   0xffff");
    }
}
