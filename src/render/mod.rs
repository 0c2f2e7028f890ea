mod core;

pub use core::Renderer;
