//! SGR mouse-report decoding: `ESC [ < Pb ; Px ; Py (M|m)`.
//!
//! This is the one inbound escape format the engine owns. Anything that does
//! not match decodes to `None` and the router drops it silently.

/// Press/release discriminator taken from the report terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
}

/// Structured mouse click as reported by the peer terminal. `column` and
/// `row` are the raw one-based report coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReport {
    pub button: u16,
    pub column: u16,
    pub row: u16,
    pub kind: MouseEventKind,
}

/// Decode one SGR mouse report, or `None` for any non-matching chunk.
pub fn decode_sgr(chunk: &[u8]) -> Option<MouseReport> {
    let rest = chunk.strip_prefix(b"\x1b[<")?;
    let (params, terminator) = rest.split_at(rest.len().checked_sub(1)?);
    let kind = match terminator.first()? {
        b'M' => MouseEventKind::Press,
        b'm' => MouseEventKind::Release,
        _ => return None,
    };

    let params = std::str::from_utf8(params).ok()?;
    let mut fields = params.split(';');
    let button = fields.next()?.parse().ok()?;
    let column = fields.next()?.parse().ok()?;
    let row = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }

    Some(MouseReport {
        button,
        column,
        row,
        kind,
    })
}
