use bitflags::bitflags;

bitflags! {
    pub struct CompileFlags: u32 {
        const NO_FLAG = 0;
        const BRACKET_ALTERNATION = 1 << 1;
        const DEBUG = 1 << 2;
    }
}

impl Default for CompileFlags {
    fn default() -> Self {
        CompileFlags::BRACKET_ALTERNATION
    }
}

/// Whether `c` is a literal alphabet symbol rather than an operator or grouping character.
pub fn is_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
