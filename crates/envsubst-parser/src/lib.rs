//! envsubst parser: converts a token stream into a node tree.

mod parser;

pub use parser::{parse, Parser};
