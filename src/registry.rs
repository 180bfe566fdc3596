//! Shared swarm registries.
//!
//! Connection stages running on any number of event-loop threads consult
//! these concurrently. Both registries are backed by sharded maps, so
//! lookups and inserts are safe without external locking; a connection's
//! record and session are only ever written by the stage that owns that
//! connection id.

mod peers;
mod torrents;

pub use peers::{ConnectionId, PeerRecord, PeerRegistry};
pub use torrents::{Torrent, TorrentRegistry};

#[cfg(test)]
mod tests;
