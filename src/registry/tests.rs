use super::*;
use crate::info_hash::InfoHash;
use crate::peer::{PeerId, Session};
use std::net::SocketAddr;
use std::sync::Arc;

fn addr() -> SocketAddr {
    "10.0.0.7:6881".parse().unwrap()
}

fn torrent(byte: u8) -> Torrent {
    Torrent {
        info_hash: InfoHash::new([byte; 20]),
        name: format!("torrent-{}", byte),
        piece_count: 32,
    }
}

#[test]
fn test_connection_ids_are_unique() {
    let a = ConnectionId::next();
    let b = ConnectionId::next();
    assert_ne!(a, b);
}

#[test]
fn test_register_creates_blank_record() {
    let peers = PeerRegistry::new(PeerId::generate());
    let uid = peers.register(addr());

    let record = peers.get_peer(uid).unwrap();
    assert_eq!(record.addr, addr());
    assert!(record.peer_id.is_none());
    assert!(record.info_hash.is_none());
    assert_eq!(peers.peer_count(), 1);
    assert_eq!(peers.session_count(), 0);
}

#[test]
fn test_set_negotiated_fills_record() {
    let peers = PeerRegistry::new(PeerId::generate());
    let uid = peers.register(addr());
    let remote = PeerId::generate();
    let hash = InfoHash::new([3u8; 20]);

    assert!(peers.set_negotiated(uid, remote, hash));

    let record = peers.get_peer(uid).unwrap();
    assert_eq!(record.peer_id, Some(remote));
    assert_eq!(record.info_hash, Some(hash));
}

#[test]
fn test_set_negotiated_unknown_uid() {
    let peers = PeerRegistry::new(PeerId::generate());
    let uid = ConnectionId::next();
    assert!(!peers.set_negotiated(uid, PeerId::generate(), InfoHash::new([0u8; 20])));
}

#[test]
fn test_session_lifecycle() {
    let peers = PeerRegistry::new(PeerId::generate());
    let uid = peers.register(addr());
    let handle = Arc::new(torrent(5));
    let remote = PeerId::generate();

    peers.add_session(uid, Session::new(addr(), remote, handle));
    assert!(peers.has_session(uid));
    assert_eq!(peers.session_count(), 1);

    let peer_id = peers.with_session(uid, |session| session.peer_id).unwrap();
    assert_eq!(peer_id, remote);

    peers.remove(uid);
    assert!(!peers.has_session(uid));
    assert!(peers.get_peer(uid).is_none());
}

#[test]
fn test_with_session_without_session() {
    let peers = PeerRegistry::new(PeerId::generate());
    let uid = peers.register(addr());
    assert!(peers.with_session(uid, |_| ()).is_none());
}

#[test]
fn test_torrent_registry() {
    let torrents = TorrentRegistry::new();
    assert!(torrents.is_empty());

    let handle = torrents.register(torrent(1));
    assert_eq!(torrents.len(), 1);
    assert!(torrents.has(&handle.info_hash));

    let fetched = torrents.get(&handle.info_hash).unwrap();
    assert_eq!(fetched.name, "torrent-1");

    assert!(!torrents.has(&InfoHash::new([9u8; 20])));
    assert!(torrents.get(&InfoHash::new([9u8; 20])).is_none());

    torrents.remove(&handle.info_hash);
    assert!(torrents.is_empty());
}

#[test]
fn test_concurrent_registration() {
    let peers = Arc::new(PeerRegistry::new(PeerId::generate()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let peers = Arc::clone(&peers);
            std::thread::spawn(move || peers.register(addr()))
        })
        .collect();

    let uids: std::collections::HashSet<_> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(uids.len(), 8);
    assert_eq!(peers.peer_count(), 8);
}
