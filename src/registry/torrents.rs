use crate::info_hash::InfoHash;
use dashmap::DashMap;
use std::sync::Arc;

/// A torrent this node is sharing.
#[derive(Debug)]
pub struct Torrent {
    pub info_hash: InfoHash,
    pub name: String,
    pub piece_count: usize,
}

/// All torrents this node serves, keyed by info-hash.
///
/// Existence of an entry is the precondition for accepting a handshake;
/// the handshake path only ever reads this registry.
#[derive(Default)]
pub struct TorrentRegistry {
    torrents: DashMap<InfoHash, Arc<Torrent>>,
}

impl TorrentRegistry {
    pub fn new() -> Self {
        Self {
            torrents: DashMap::new(),
        }
    }

    /// Adds a torrent, returning the shared handle.
    pub fn register(&self, torrent: Torrent) -> Arc<Torrent> {
        let torrent = Arc::new(torrent);
        self.torrents.insert(torrent.info_hash, Arc::clone(&torrent));
        torrent
    }

    pub fn has(&self, hash: &InfoHash) -> bool {
        self.torrents.contains_key(hash)
    }

    pub fn get(&self, hash: &InfoHash) -> Option<Arc<Torrent>> {
        self.torrents.get(hash).map(|entry| Arc::clone(&entry))
    }

    pub fn remove(&self, hash: &InfoHash) -> Option<Arc<Torrent>> {
        self.torrents.remove(hash).map(|(_, torrent)| torrent)
    }

    pub fn len(&self) -> usize {
        self.torrents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.torrents.is_empty()
    }
}
