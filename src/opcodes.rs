/// A mnemonic and the value stored in its opcode cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub opcode: u16,
}

impl Instruction {
    /// NOP and HLT stand alone, every other instruction is followed by an operand cell.
    pub fn takes_operand(&self) -> bool {
        !matches!(self.mnemonic, "NOP" | "HLT")
    }

    /// Cells this instruction occupies in the image.
    pub fn size(&self) -> usize {
        if self.takes_operand() { 2 } else { 1 }
    }
}

// Append-only: new instructions go at the end.
pub const INSTRUCTIONS: &[Instruction] = &[
    Instruction { mnemonic: "NOP", opcode: 0x00 },
    Instruction { mnemonic: "STA", opcode: 0x10 },
    Instruction { mnemonic: "LDA", opcode: 0x20 },
    Instruction { mnemonic: "ADD", opcode: 0x30 },
    Instruction { mnemonic: "OR", opcode: 0x40 },
    Instruction { mnemonic: "AND", opcode: 0x50 },
    Instruction { mnemonic: "NOT", opcode: 0x60 },
    Instruction { mnemonic: "JMP", opcode: 0x80 },
    Instruction { mnemonic: "JN", opcode: 0x90 },
    Instruction { mnemonic: "JZ", opcode: 0xA0 },
    Instruction { mnemonic: "HLT", opcode: 0xF0 },
];

/// Index of `mnemonic` in [`INSTRUCTIONS`]. Matching is exact and case-sensitive.
pub fn lookup(mnemonic: &str) -> Option<usize> {
    INSTRUCTIONS.iter().position(|instr| instr.mnemonic == mnemonic)
}

pub fn find(mnemonic: &str) -> Option<&'static Instruction> {
    lookup(mnemonic).map(|index| &INSTRUCTIONS[index])
}
