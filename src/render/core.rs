use std::collections::HashMap;
use std::sync::Mutex;

use blake3::Hash;

use crate::channel::Channel;
use crate::error::Result;
use crate::layout::Placement;
use crate::terminal::TerminalDriver;
use crate::widget::Widget;

/// Incremental screen writer for one session.
///
/// Every write is the move/clear/write triad composed into a single buffer
/// and sent under one lock, so concurrently running loops can never
/// interleave an escape sequence mid-stream. A per-widget content hash of the
/// last rendered line suppresses redraws whose bytes have not changed.
pub struct Renderer {
    state: Mutex<RenderState>,
}

#[derive(Default)]
struct RenderState {
    lines: HashMap<usize, Hash>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RenderState::default()),
        }
    }

    /// Initial pass: render every displayable widget once at its cached
    /// placement.
    pub fn draw_all(
        &self,
        channel: &dyn Channel,
        driver: &dyn TerminalDriver,
        widgets: &[Widget],
        placements: &[Option<Placement>],
    ) -> Result<()> {
        for (index, widget) in widgets.iter().enumerate() {
            let (Some(line), Some(placement)) =
                (widget.render_line(), placements.get(index).copied().flatten())
            else {
                continue;
            };
            self.draw_line(channel, driver, index, placement, &line)?;
        }
        Ok(())
    }

    /// Re-render one widget; returns whether bytes were actually sent.
    /// Suppressed when the rendered line matches the last frame.
    pub fn draw_line(
        &self,
        channel: &dyn Channel,
        driver: &dyn TerminalDriver,
        index: usize,
        placement: Placement,
        line: &str,
    ) -> Result<bool> {
        let hash = blake3::hash(line.as_bytes());
        let mut state = self.lock();
        if state.lines.get(&index) == Some(&hash) {
            return Ok(false);
        }

        let mut out = String::new();
        out.push_str(&driver.move_to(placement.row, placement.col));
        out.push_str(&driver.clear_to_eol());
        out.push_str(line);
        channel.send(out.as_bytes())?;

        state.lines.insert(index, hash);
        Ok(true)
    }

    /// Send raw control bytes (session setup and teardown sequences) under
    /// the same write lock as widget draws.
    pub fn send_raw(&self, channel: &dyn Channel, bytes: &[u8]) -> Result<()> {
        let _state = self.lock();
        channel.send(bytes)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RenderState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ScriptedChannel;
    use crate::terminal::AnsiDriver;

    fn placement() -> Placement {
        Placement {
            row: 2,
            col: 3,
            width: 2,
        }
    }

    #[test]
    fn draw_emits_move_clear_write() {
        let channel = ScriptedChannel::default();
        let renderer = Renderer::new();
        renderer
            .draw_line(&channel, &AnsiDriver::new(), 0, placement(), "hi")
            .unwrap();
        let sent = String::from_utf8(channel.sent()).unwrap();
        assert_eq!(sent, "\x1b[3;4H\x1b[Khi");
    }

    #[test]
    fn unchanged_line_is_not_resent() {
        let channel = ScriptedChannel::default();
        let renderer = Renderer::new();
        let driver = AnsiDriver::new();
        assert!(
            renderer
                .draw_line(&channel, &driver, 0, placement(), "hi")
                .unwrap()
        );
        let first = channel.sent().len();
        assert!(
            !renderer
                .draw_line(&channel, &driver, 0, placement(), "hi")
                .unwrap()
        );
        assert_eq!(channel.sent().len(), first);
        assert!(
            renderer
                .draw_line(&channel, &driver, 0, placement(), "ho")
                .unwrap()
        );
        assert!(channel.sent().len() > first);
    }

    #[test]
    fn write_fault_propagates() {
        let channel = ScriptedChannel::default();
        channel.close();
        let renderer = Renderer::new();
        assert!(
            renderer
                .draw_line(&channel, &AnsiDriver::new(), 0, placement(), "hi")
                .is_err()
        );
    }
}
