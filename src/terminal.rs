//! Terminal capability seam.
//!
//! The engine never talks to a local terminal; every control sequence is
//! resolved through a [`TerminalDriver`] and sent to the session's channel as
//! bytes. The driver also owns the style name table used by the layout
//! parser's pipe suffixes.

use std::collections::HashMap;

use crossterm::Command;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color};
use crossterm::terminal::{Clear, ClearType};

use crate::style::Style;

/// Enable SGR mouse-press reporting. One of the two raw sequences the engine
/// owns itself; everything else comes from the driver.
pub const ENABLE_MOUSE: &str = "\x1b[?1000h\x1b[?1006h";

/// Disable mouse reporting, restoring the peer terminal's default state.
pub const DISABLE_MOUSE: &str = "\x1b[?1006l\x1b[?1000l";

/// Resolves named style transforms and supplies control-sequence primitives.
///
/// Coordinates are zero-based (row, column), matching widget placements.
pub trait TerminalDriver: Send + Sync {
    fn resolve_style(&self, name: &str) -> Option<Style>;
    fn move_to(&self, row: u16, col: u16) -> String;
    fn clear_to_eol(&self) -> String;
    fn clear_screen(&self) -> String;
    fn hide_cursor(&self) -> String;
    fn show_cursor(&self) -> String;
}

/// Default driver backed by crossterm's ANSI command set.
pub struct AnsiDriver {
    styles: HashMap<&'static str, Style>,
}

impl AnsiDriver {
    pub fn new() -> Self {
        let mut styles = HashMap::new();
        styles.insert("bold", Style::Attr(Attribute::Bold));
        styles.insert("dim", Style::Attr(Attribute::Dim));
        styles.insert("italic", Style::Attr(Attribute::Italic));
        styles.insert("underline", Style::Attr(Attribute::Underlined));
        styles.insert("reverse", Style::Attr(Attribute::Reverse));
        styles.insert("red", Style::Fg(Color::Red));
        styles.insert("green", Style::Fg(Color::Green));
        styles.insert("yellow", Style::Fg(Color::Yellow));
        styles.insert("blue", Style::Fg(Color::Blue));
        styles.insert("magenta", Style::Fg(Color::Magenta));
        styles.insert("cyan", Style::Fg(Color::Cyan));
        styles.insert("white", Style::Fg(Color::White));
        styles.insert("grey", Style::Fg(Color::Grey));
        styles.insert("dark-grey", Style::Fg(Color::DarkGrey));
        Self { styles }
    }
}

impl Default for AnsiDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDriver for AnsiDriver {
    fn resolve_style(&self, name: &str) -> Option<Style> {
        self.styles.get(name).copied()
    }

    fn move_to(&self, row: u16, col: u16) -> String {
        ansi(MoveTo(col, row))
    }

    fn clear_to_eol(&self) -> String {
        ansi(Clear(ClearType::UntilNewLine))
    }

    fn clear_screen(&self) -> String {
        ansi(Clear(ClearType::All))
    }

    fn hide_cursor(&self) -> String {
        ansi(Hide)
    }

    fn show_cursor(&self) -> String {
        ansi(Show)
    }
}

fn ansi(command: impl Command) -> String {
    let mut out = String::new();
    let _ = command.write_ansi(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_is_one_based_on_the_wire() {
        let driver = AnsiDriver::new();
        assert_eq!(driver.move_to(2, 5), "\x1b[3;6H");
    }

    #[test]
    fn known_styles_resolve() {
        let driver = AnsiDriver::new();
        assert_eq!(driver.resolve_style("red"), Some(Style::Fg(Color::Red)));
        assert!(driver.resolve_style("blink-marquee").is_none());
    }
}
