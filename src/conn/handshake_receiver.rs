use super::channel::Channel;
use super::message_receiver::MessageReceiver;
use super::shutdown::ShutdownStage;
use super::stage::Stage;
use crate::peer::{Handshake, PeerError, PeerId, Session, BASE_HANDSHAKE_LEN};
use crate::registry::{ConnectionId, PeerRegistry, TorrentRegistry};
use bytes::BytesMut;
use std::io;
use std::sync::Arc;
use tracing::{debug, trace};

/// Largest possible handshake frame; the tag length is a single byte.
const MAX_FRAME_LEN: usize = BASE_HANDSHAKE_LEN + u8::MAX as usize;

/// Decodes the initial handshake frame for one accepted connection.
///
/// The frame length is only known after the first byte, so decoding is
/// two-phase: read the tag-length byte, size the buffer, then accumulate
/// the rest of the frame across however many readiness events it takes.
/// The length byte is kept as the buffer's first byte so the codec sees
/// the frame exactly as it came off the wire. Once the frame completes
/// the stage validates it, sends the reply handshake, registers the
/// session, and hands the connection to a [`MessageReceiver`].
pub struct HandshakeReceiver {
    uid: ConnectionId,
    peers: Arc<PeerRegistry>,
    torrents: Arc<TorrentRegistry>,
    buf: BytesMut,
    frame_len: Option<usize>,
}

impl HandshakeReceiver {
    pub fn new(uid: ConnectionId, peers: Arc<PeerRegistry>, torrents: Arc<TorrentRegistry>) -> Self {
        Self {
            uid,
            peers,
            torrents,
            buf: BytesMut::new(),
            frame_len: None,
        }
    }

    /// Validates the completed frame and promotes the connection.
    ///
    /// Runs at most once per connection: the caller only gets here when
    /// the buffer holds the full frame, and every return path consumes
    /// the stage.
    fn complete(self: Box<Self>, channel: &mut dyn Channel) -> Result<Box<dyn Stage>, PeerError> {
        let handshake = match Handshake::decode(&self.buf) {
            Ok(handshake) => handshake,
            Err(err) => {
                debug!(addr = ?channel.peer_addr().ok(), %err, "rejecting malformed handshake");
                return Ok(Box::new(ShutdownStage));
            }
        };

        let Some(torrent) = self.torrents.get(&handshake.info_hash) else {
            debug!(
                info_hash = %handshake.info_hash,
                "peer requested a torrent we do not serve"
            );
            return Ok(Box::new(ShutdownStage));
        };

        let peer_id = PeerId(handshake.peer_id);
        if !self.peers.set_negotiated(self.uid, peer_id, handshake.info_hash) {
            // The acceptor registers the record before this stage runs,
            // so a missing record means the connection is already gone.
            debug!(uid = ?self.uid, "peer record vanished before handshake completed");
            return Ok(Box::new(ShutdownStage));
        }

        // Best-effort reply; a blocked or partial write is flushed by
        // the steady-state machinery, not retried here.
        let reply = Handshake::new(handshake.info_hash, *self.peers.local_id().as_bytes()).encode();
        match channel.try_write(&reply) {
            Ok(written) if written < reply.len() => {
                trace!(uid = ?self.uid, written, "partial handshake reply")
            }
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {}
            Err(err) => return Err(err.into()),
        }

        let addr = channel.peer_addr()?;
        self.peers.add_session(self.uid, Session::new(addr, peer_id, torrent));
        trace!(uid = ?self.uid, peer = %peer_id, %addr, "handshake complete");

        Ok(Box::new(MessageReceiver::new(self.uid, Arc::clone(&self.peers))))
    }
}

impl Stage for HandshakeReceiver {
    fn advance(mut self: Box<Self>, channel: &mut dyn Channel) -> Result<Box<dyn Stage>, PeerError> {
        let total = match self.frame_len {
            Some(total) => total,
            None => {
                let mut len = [0u8; 1];
                match channel.try_read(&mut len) {
                    Ok(0) => return Err(PeerError::HandshakeUnderrun),
                    Ok(_) => {}
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(self),
                    Err(err) => return Err(err.into()),
                }
                let total = Handshake::frame_len(len[0]);
                self.buf.reserve(total);
                self.buf.extend_from_slice(&len);
                self.frame_len = Some(total);
                total
            }
        };

        // One body read per readiness event; the body usually arrives in
        // the same segment as the length byte.
        let want = total - self.buf.len();
        if want > 0 {
            let mut chunk = [0u8; MAX_FRAME_LEN];
            match channel.try_read(&mut chunk[..want]) {
                Ok(0) => return Err(PeerError::HandshakeUnderrun),
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(self),
                Err(err) => return Err(err.into()),
            }
        }

        if self.buf.len() < total {
            return Ok(self);
        }

        self.complete(channel)
    }
}
