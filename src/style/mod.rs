mod core;

pub use core::{Style, StyledText, paint};
