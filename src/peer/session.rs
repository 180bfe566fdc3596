use super::bitfield::Bitfield;
use super::message::Message;
use super::peer_id::PeerId;
use crate::info_hash::InfoHash;
use crate::registry::Torrent;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Choke and interest flags for one peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChokingState {
    pub am_choking: bool,
    pub am_interested: bool,
    pub peer_choking: bool,
    pub peer_interested: bool,
}

impl Default for ChokingState {
    fn default() -> Self {
        Self {
            am_choking: true,
            am_interested: false,
            peer_choking: true,
            peer_interested: false,
        }
    }
}

/// A validated peer connection bound to a torrent.
///
/// Created exactly once per connection, after its handshake has been
/// decoded and the requested torrent found locally. The session records
/// the negotiated identity pair and accumulates steady-state protocol
/// state as messages arrive.
pub struct Session {
    /// The peer's socket address.
    pub addr: SocketAddr,
    /// The peer ID received in the handshake.
    pub peer_id: PeerId,
    /// The info-hash the peer negotiated.
    pub info_hash: InfoHash,
    /// The torrent this session is sharing.
    pub torrent: Arc<Torrent>,
    /// Choking state for this connection.
    pub choking: ChokingState,
    /// The peer's bitfield (pieces they have).
    pub bitfield: Option<Bitfield>,
    /// When the session was established.
    pub connected_at: Instant,
    /// When the last message was received.
    pub last_message_at: Instant,
    /// Total bytes downloaded from this peer.
    pub bytes_downloaded: u64,
    /// Total bytes uploaded to this peer.
    pub bytes_uploaded: u64,
}

impl Session {
    pub fn new(addr: SocketAddr, peer_id: PeerId, torrent: Arc<Torrent>) -> Self {
        let now = Instant::now();
        Self {
            addr,
            peer_id,
            info_hash: torrent.info_hash,
            torrent,
            choking: ChokingState::default(),
            bitfield: None,
            connected_at: now,
            last_message_at: now,
            bytes_downloaded: 0,
            bytes_uploaded: 0,
        }
    }

    /// Applies a received message to the session's view of the peer.
    pub fn handle(&mut self, message: &Message) {
        self.last_message_at = Instant::now();

        match message {
            Message::Choke => self.choking.peer_choking = true,
            Message::Unchoke => self.choking.peer_choking = false,
            Message::Interested => self.choking.peer_interested = true,
            Message::NotInterested => self.choking.peer_interested = false,
            Message::Have { piece } => {
                if let Some(bitfield) = &mut self.bitfield {
                    bitfield.set_piece(*piece as usize);
                }
            }
            Message::Bitfield(bits) => {
                self.bitfield = Some(Bitfield::from_bytes(bits.clone(), self.torrent.piece_count));
            }
            Message::Piece { data, .. } => {
                self.bytes_downloaded += data.len() as u64;
            }
            _ => {}
        }
    }

    /// Records bytes sent to the peer.
    pub fn record_upload(&mut self, len: usize) {
        self.bytes_uploaded += len as u64;
    }

    pub fn set_interested(&mut self, interested: bool) {
        self.choking.am_interested = interested;
    }

    pub fn set_choking(&mut self, choking: bool) {
        self.choking.am_choking = choking;
    }
}
