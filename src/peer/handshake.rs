use super::error::PeerError;
use crate::info_hash::InfoHash;
use bytes::{BufMut, Bytes, BytesMut};

/// Protocol identifier carried in every handshake frame.
pub const PROTOCOL: &[u8] = b"BitTorrent protocol";

/// Frame length excluding the variable protocol tag: one length byte,
/// eight reserved bytes, the info-hash and the peer id.
pub const BASE_HANDSHAKE_LEN: usize = 49;

/// The first frame exchanged on a new peer connection.
///
/// Wire layout: `[1 byte tag length L][L bytes protocol tag]
/// [8 bytes reserved][20 bytes info-hash][20 bytes peer id]`, for a
/// total of `49 + L` bytes. The total is only known after the first
/// byte, which is why connection decoding reads the length prefix
/// before sizing its buffer.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub info_hash: InfoHash,
    pub peer_id: [u8; 20],
    pub reserved: [u8; 8],
}

impl Handshake {
    pub fn new(info_hash: InfoHash, peer_id: [u8; 20]) -> Self {
        Self {
            info_hash,
            peer_id,
            reserved: [0u8; 8],
        }
    }

    /// Total frame length for a declared protocol-tag length.
    pub fn frame_len(tag_len: u8) -> usize {
        BASE_HANDSHAKE_LEN + tag_len as usize
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::frame_len(PROTOCOL.len() as u8));
        buf.put_u8(PROTOCOL.len() as u8);
        buf.put_slice(PROTOCOL);
        buf.put_slice(&self.reserved);
        buf.put_slice(self.info_hash.as_bytes());
        buf.put_slice(&self.peer_id);
        buf.freeze()
    }

    /// Decodes a complete frame.
    ///
    /// The first byte of `data` is the declared tag length; the buffer
    /// must hold exactly the declared total and the tag must match
    /// [`PROTOCOL`]. Leaves no partial state behind on failure.
    pub fn decode(data: &[u8]) -> Result<Self, PeerError> {
        let tag_len = *data.first().ok_or(PeerError::InvalidHandshake)? as usize;
        if data.len() != BASE_HANDSHAKE_LEN + tag_len {
            return Err(PeerError::InvalidHandshake);
        }
        if &data[1..1 + tag_len] != PROTOCOL {
            return Err(PeerError::InvalidHandshake);
        }
        let rest = &data[1 + tag_len..];

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&rest[..8]);

        let mut info_hash = [0u8; 20];
        info_hash.copy_from_slice(&rest[8..28]);

        let mut peer_id = [0u8; 20];
        peer_id.copy_from_slice(&rest[28..48]);

        Ok(Self {
            info_hash: InfoHash::new(info_hash),
            peer_id,
            reserved,
        })
    }
}
