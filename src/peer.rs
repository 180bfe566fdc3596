//! Peer wire protocol (BEP-3)
//!
//! This module implements the wire-level pieces of the peer protocol: the
//! handshake frame, the core message set, peer identity, and the session
//! state a connection carries once its handshake has been validated.

mod bitfield;
mod error;
mod handshake;
mod message;
mod peer_id;
mod session;

pub use bitfield::Bitfield;
pub use error::PeerError;
pub use handshake::{Handshake, BASE_HANDSHAKE_LEN, PROTOCOL};
pub use message::{Message, MessageId, MAX_MESSAGE_SIZE};
pub use peer_id::PeerId;
pub use session::{ChokingState, Session};
