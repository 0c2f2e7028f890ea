//! Transport seam for one remote terminal session.
//!
//! The SSH handshake and accept loop live outside this crate; by the time a
//! session runs, it owns an established duplex byte stream behind the
//! [`Channel`] trait.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Duplex byte stream carrying one session. `receive` blocks until the peer
/// sends data; a zero-length chunk is a heartbeat, not end-of-stream.
pub trait Channel: Send + Sync {
    fn receive(&self, max_bytes: usize) -> io::Result<Vec<u8>>;
    fn send(&self, bytes: &[u8]) -> io::Result<()>;
    fn close(&self);
}

impl Channel for TcpStream {
    fn receive(&self, max_bytes: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max_bytes.max(1)];
        let mut stream = self;
        let read = stream.read(&mut buf)?;
        buf.truncate(read);
        Ok(buf)
    }

    fn send(&self, bytes: &[u8]) -> io::Result<()> {
        let mut stream = self;
        stream.write_all(bytes)
    }

    fn close(&self) {
        let _ = self.shutdown(Shutdown::Both);
    }
}

/// In-memory channel fed with a fixed inbound script.
///
/// Used to drive a session without a live peer: each `receive` pops the next
/// scripted chunk and everything the engine sends is captured for inspection.
/// Once the script is exhausted, `receive` reports a peer disconnect.
#[derive(Default)]
pub struct ScriptedChannel {
    incoming: Mutex<VecDeque<Vec<u8>>>,
    outgoing: Mutex<Vec<u8>>,
    closed: AtomicBool,
}

impl ScriptedChannel {
    pub fn new<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Vec<u8>>,
    {
        Self {
            incoming: Mutex::new(chunks.into_iter().map(Into::into).collect()),
            outgoing: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Everything the engine has written so far.
    pub fn sent(&self) -> Vec<u8> {
        self.outgoing
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Channel for ScriptedChannel {
    fn receive(&self, _max_bytes: usize) -> io::Result<Vec<u8>> {
        let mut queue = self
            .incoming
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        queue
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn send(&self, bytes: &[u8]) -> io::Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "channel closed"));
        }
        self.outgoing
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .extend_from_slice(bytes);
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_channel_replays_chunks_in_order() {
        let channel = ScriptedChannel::new([b"ab".to_vec(), b"c".to_vec()]);
        assert_eq!(channel.receive(16).unwrap(), b"ab");
        assert_eq!(channel.receive(16).unwrap(), b"c");
        assert!(channel.receive(16).is_err());
    }

    #[test]
    fn send_after_close_is_a_fault() {
        let channel = ScriptedChannel::new(Vec::<Vec<u8>>::new());
        channel.send(b"ok").unwrap();
        channel.close();
        assert!(channel.send(b"late").is_err());
        assert_eq!(channel.sent(), b"ok");
    }
}
