use crate::info_hash::InfoHash;
use crate::peer::{PeerId, Session};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one accepted connection, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Mints a fresh connection id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What is known about a connection before and after its handshake.
///
/// The record is created when the connection is accepted; the negotiated
/// fields are filled in exactly once, by a successful handshake.
#[derive(Debug, Clone)]
pub struct PeerRecord {
    pub addr: SocketAddr,
    pub peer_id: Option<PeerId>,
    pub info_hash: Option<InfoHash>,
}

/// All peer connections known to this node, keyed by connection id.
///
/// Records track every accepted connection; sessions exist only for
/// connections whose handshake has been validated. Updates to a record
/// happen under its key's shard lock, and each session sits behind its
/// own mutex, so no reader can observe a half-updated entry.
pub struct PeerRegistry {
    local_id: PeerId,
    peers: DashMap<ConnectionId, PeerRecord>,
    sessions: DashMap<ConnectionId, Mutex<Session>>,
}

impl PeerRegistry {
    pub fn new(local_id: PeerId) -> Self {
        Self {
            local_id,
            peers: DashMap::new(),
            sessions: DashMap::new(),
        }
    }

    /// The peer ID this node presents in outbound handshakes.
    pub fn local_id(&self) -> PeerId {
        self.local_id
    }

    /// Creates the record for a freshly accepted connection.
    pub fn register(&self, addr: SocketAddr) -> ConnectionId {
        let uid = ConnectionId::next();
        self.peers.insert(
            uid,
            PeerRecord {
                addr,
                peer_id: None,
                info_hash: None,
            },
        );
        uid
    }

    /// Returns a snapshot of the record for `uid`.
    pub fn get_peer(&self, uid: ConnectionId) -> Option<PeerRecord> {
        self.peers.get(&uid).map(|record| record.clone())
    }

    /// Stores the identity pair negotiated by a successful handshake.
    ///
    /// Returns false if the connection is no longer registered.
    pub fn set_negotiated(&self, uid: ConnectionId, peer_id: PeerId, info_hash: InfoHash) -> bool {
        match self.peers.get_mut(&uid) {
            Some(mut record) => {
                record.peer_id = Some(peer_id);
                record.info_hash = Some(info_hash);
                true
            }
            None => false,
        }
    }

    /// Registers the validated session for a connection.
    pub fn add_session(&self, uid: ConnectionId, session: Session) {
        self.sessions.insert(uid, Mutex::new(session));
    }

    /// Runs `f` against the session for `uid`, if one is registered.
    pub fn with_session<R>(&self, uid: ConnectionId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.sessions.get(&uid).map(|entry| f(&mut entry.lock()))
    }

    pub fn has_session(&self, uid: ConnectionId) -> bool {
        self.sessions.contains_key(&uid)
    }

    /// Drops the record and any session for a closed connection.
    pub fn remove(&self, uid: ConnectionId) {
        self.sessions.remove(&uid);
        self.peers.remove(&uid);
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
