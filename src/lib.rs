pub mod analyzer;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod token;

pub use error::CompileError;
pub use pipeline::{CompileOptions, Compilation, compile};
