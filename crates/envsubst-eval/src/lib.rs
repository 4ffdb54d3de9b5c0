//! envsubst evaluator: the naming store and the node tree that renders
//! against it.

pub mod env;
pub mod node;

pub use env::Env;
pub use node::{Context, Node, Operator, SubstitutionNode, TextNode, VariableNode};
