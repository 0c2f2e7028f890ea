//! Foyer renders declaratively-specified widget layouts onto remote terminal
//! sessions reached through a byte-oriented duplex channel, and routes raw
//! terminal input into focus changes and field edits.
//!
//! The SSH handshake, credential checks and accept loop live outside this
//! crate; a session arrives here as an established [`Channel`] plus a
//! [`TerminalDriver`] resolving style names and control sequences.

pub mod channel;
pub mod error;
pub mod input;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod session;
pub mod style;
pub mod terminal;
pub mod widget;
pub mod width;

pub use channel::{Channel, ScriptedChannel};
pub use error::{Result, UiError};
pub use input::{Directive, MouseEventKind, MouseReport, decode_sgr, route};
pub use layout::{Layout, Placement, solve};
pub use logging::{FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger};
pub use metrics::{MetricSnapshot, SessionMetrics};
pub use render::Renderer;
pub use session::{FocusChange, FocusManager, Session, SessionConfig, UiState};
pub use style::{Style, StyledText};
pub use terminal::{AnsiDriver, DISABLE_MOUSE, ENABLE_MOUSE, TerminalDriver};
pub use widget::{BLINK_FRAMES, TextInput, Widget};
pub use width::display_width;
