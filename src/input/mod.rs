//! Input classification: raw channel chunks become focus moves, field edits,
//! mouse events or a quit signal.

mod mouse;
mod router;

pub use mouse::{MouseEventKind, MouseReport, decode_sgr};
pub use router::{Directive, route};
