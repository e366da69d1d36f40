pub const MEMORY_SIZE: usize = 512;
pub const HEADER: [u16; 2] = [0x4E03, 0x5244];
pub const HEADER_WORDS: usize = HEADER.len();
pub const DEFAULT_OUTPUT: &str = "bytecode.mem";
