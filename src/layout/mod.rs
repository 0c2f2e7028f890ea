//! Layout module orchestrator.
//!
//! The parser turns a layout description into an ordered widget list; the
//! positioning pass assigns each displayable widget its screen cell.

mod parser;
mod position;

pub use parser::Layout;
pub use position::{Placement, solve};
