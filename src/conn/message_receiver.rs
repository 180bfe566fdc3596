use super::channel::Channel;
use super::shutdown::ShutdownStage;
use super::stage::Stage;
use crate::peer::{Message, PeerError, MAX_MESSAGE_SIZE};
use crate::registry::{ConnectionId, PeerRegistry};
use bytes::BytesMut;
use std::io;
use std::sync::Arc;
use tracing::{debug, trace};

/// Length prefix of every steady-state message.
const HEADER_LEN: usize = 4;

/// Outcome of one read pass against a fill target.
enum Fill {
    Complete,
    Pending,
    Eof,
}

/// Decodes length-prefixed peer-wire messages, one frame at a time.
///
/// Uses the same two-phase technique as the handshake stage: a fixed
/// prefix determines the frame length, the body accumulates across
/// readiness events, and the stage returns itself until the frame
/// completes. Completed frames are applied to the registered session.
pub struct MessageReceiver {
    uid: ConnectionId,
    peers: Arc<PeerRegistry>,
    buf: BytesMut,
    frame_len: Option<usize>,
}

impl MessageReceiver {
    pub fn new(uid: ConnectionId, peers: Arc<PeerRegistry>) -> Self {
        Self {
            uid,
            peers,
            buf: BytesMut::with_capacity(HEADER_LEN),
            frame_len: None,
        }
    }

    /// One read attempt toward `target` buffered bytes.
    fn fill(&mut self, channel: &mut dyn Channel, target: usize) -> io::Result<Fill> {
        let want = target - self.buf.len();
        if want > 0 {
            let mut chunk = vec![0u8; want];
            match channel.try_read(&mut chunk) {
                Ok(0) => return Ok(Fill::Eof),
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(Fill::Pending),
                Err(err) => return Err(err),
            }
        }
        Ok(if self.buf.len() >= target {
            Fill::Complete
        } else {
            Fill::Pending
        })
    }

    /// Decodes and applies the completed frame, then resets for the next.
    fn dispatch(&mut self) -> Result<(), PeerError> {
        let frame = self.buf.split().freeze();
        self.frame_len = None;

        let message = Message::decode(frame)?;
        trace!(uid = ?self.uid, ?message, "peer message");
        self.peers.with_session(self.uid, |session| session.handle(&message));
        Ok(())
    }
}

impl Stage for MessageReceiver {
    fn advance(mut self: Box<Self>, channel: &mut dyn Channel) -> Result<Box<dyn Stage>, PeerError> {
        if self.frame_len.is_none() {
            match self.fill(channel, HEADER_LEN)? {
                Fill::Complete => {
                    let length =
                        u32::from_be_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]])
                            as usize;
                    if length > MAX_MESSAGE_SIZE {
                        debug!(uid = ?self.uid, length, "dropping peer: oversized message");
                        return Ok(Box::new(ShutdownStage));
                    }
                    self.frame_len = Some(HEADER_LEN + length);
                }
                Fill::Pending => return Ok(self),
                // A peer leaving between frames is a normal departure.
                Fill::Eof => return Ok(Box::new(ShutdownStage)),
            }
        }

        if let Some(total) = self.frame_len {
            match self.fill(channel, total)? {
                Fill::Complete => {
                    if let Err(err) = self.dispatch() {
                        debug!(uid = ?self.uid, %err, "dropping peer: malformed message");
                        return Ok(Box::new(ShutdownStage));
                    }
                }
                Fill::Pending => return Ok(self),
                Fill::Eof => return Ok(Box::new(ShutdownStage)),
            }
        }

        Ok(self)
    }
}
