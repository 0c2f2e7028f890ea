use crate::input::mouse::{MouseEventKind, decode_sgr};
use crate::session::{FocusChange, UiState};

/// What the owning session loop should do after a chunk was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    /// A focus transition the session must render (both sides redrawn once).
    Focus(FocusChange),
    /// Terminate the session loop.
    Quit,
}

const UP: &[u8] = b"\x1b[A";
const DOWN: &[u8] = b"\x1b[B";
const RIGHT: &[u8] = b"\x1b[C";
const LEFT: &[u8] = b"\x1b[D";
const ESCAPE: &[u8] = b"\x1b";
const FORWARD_DELETE: &[u8] = b"\x1b[3~";

/// Classify one received chunk and dispatch it; exactly one branch fires.
///
/// Navigation works regardless of focus; edit operations require a focused
/// input; `q` quits only while nothing is focused. Unrecognized sequences
/// and malformed mouse reports are dropped silently; the router never
/// errors.
pub fn route(ui: &mut UiState, chunk: &[u8]) -> Directive {
    if chunk == UP {
        return Directive::Focus(ui.focus_prev());
    }
    if chunk == DOWN || is_enter(chunk) {
        return Directive::Focus(ui.focus_next());
    }
    if chunk == ESCAPE {
        return Directive::Focus(ui.set_focus(None));
    }
    if let Some(report) = decode_sgr(chunk) {
        if report.kind == MouseEventKind::Press {
            // SGR rows are one-based; placements are zero-based.
            if let Some(slot) = ui.hit_test_row(report.row.saturating_sub(1)) {
                return Directive::Focus(ui.set_focus(Some(slot)));
            }
        }
        return Directive::Continue;
    }

    if ui.focused().is_none() {
        let token = chunk.trim_ascii();
        if token == b"q" || token == b"Q" {
            return Directive::Quit;
        }
        return Directive::Continue;
    }

    let Some(editor) = ui.active_editor() else {
        return Directive::Continue;
    };
    if chunk == LEFT {
        editor.move_cursor(-1);
    } else if chunk == RIGHT {
        editor.move_cursor(1);
    } else if chunk == b"\x7f" || chunk == b"\x08" {
        editor.backspace();
    } else if chunk == FORWARD_DELETE {
        editor.delete_forward();
    } else if let Some(run) = printable_run(chunk) {
        editor.insert(run);
    }
    Directive::Continue
}

/// Enter arrives as a bare CR/LF (or CRLF) chunk; an empty chunk is a
/// heartbeat and matches nothing.
fn is_enter(chunk: &[u8]) -> bool {
    !chunk.is_empty() && chunk.iter().all(|byte| matches!(byte, b'\r' | b'\n'))
}

fn printable_run(chunk: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(chunk).ok()?;
    if !text.is_empty() && text.chars().all(|ch| !ch.is_control()) {
        Some(text)
    } else {
        None
    }
}
