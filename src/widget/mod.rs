//! Widget model orchestrator; variants live in `core`, the text-input state
//! machine in `input`.

mod core;
mod input;

pub use core::Widget;
pub use input::{BLINK_FRAMES, TextInput};
