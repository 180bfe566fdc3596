//! rswarm - incremental peer-session establishment for BitTorrent swarms
//!
//! This library turns a raw, non-blocking byte stream from a remote peer
//! into a validated, registered peer session. Each connection is driven by
//! a chain of decode stages that tolerate partial reads: the event loop
//! calls the current stage whenever the socket is readable, and the stage
//! hands back whichever stage should own the next readiness event.
//!
//! # Modules
//!
//! - [`peer`] - Handshake and peer-wire message codecs, peer identity,
//!   per-peer session state
//! - [`conn`] - The incremental decode stages and the per-connection driver
//! - [`registry`] - Shared peer and torrent registries
//! - [`info_hash`] - 20-byte content identifier

pub mod conn;
pub mod info_hash;
pub mod peer;
pub mod registry;

pub use conn::{Channel, Connection, HandshakeReceiver, MessageReceiver, ShutdownStage, Stage};
pub use info_hash::InfoHash;
pub use peer::{Bitfield, ChokingState, Handshake, Message, MessageId, PeerError, PeerId, Session};
pub use registry::{ConnectionId, PeerRecord, PeerRegistry, Torrent, TorrentRegistry};
