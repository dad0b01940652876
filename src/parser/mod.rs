// Value-format string parser

pub mod ast;
pub mod format;
pub mod lexer;

// Public API re-exports
pub use ast::{DigitPattern, FormatPattern, NumberSpec, Section};
pub use format::parse_format;
