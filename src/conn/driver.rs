use super::handshake_receiver::HandshakeReceiver;
use super::shutdown::ShutdownStage;
use super::stage::Stage;
use crate::peer::PeerError;
use crate::registry::{ConnectionId, PeerRegistry, TorrentRegistry};
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;
use tracing::debug;

/// Drives one accepted connection through its decode stages.
///
/// Owns the socket for the lifetime of the connection. Each readiness
/// event dispatches to the current stage, and the stage returned by
/// [`Stage::advance`] replaces the stored one, so per-connection parsing
/// state never lives outside the stage itself.
pub struct Connection {
    uid: ConnectionId,
    stream: TcpStream,
    stage: Box<dyn Stage>,
    peers: Arc<PeerRegistry>,
}

impl Connection {
    /// Prepares an accepted socket for handshake decoding, registering
    /// its peer record.
    pub fn accept(
        stream: TcpStream,
        peers: Arc<PeerRegistry>,
        torrents: Arc<TorrentRegistry>,
    ) -> io::Result<Self> {
        let addr = stream.peer_addr()?;
        let uid = peers.register(addr);
        let stage: Box<dyn Stage> =
            Box::new(HandshakeReceiver::new(uid, Arc::clone(&peers), torrents));
        Ok(Self {
            uid,
            stream,
            stage,
            peers,
        })
    }

    pub fn uid(&self) -> ConnectionId {
        self.uid
    }

    /// Runs the connection until it shuts down, removing it from the
    /// peer registry on the way out.
    pub async fn run(mut self) -> Result<(), PeerError> {
        let result = self.drive().await;
        self.peers.remove(self.uid);
        if let Err(err) = &result {
            debug!(uid = ?self.uid, %err, "connection failed");
        }
        result
    }

    async fn drive(&mut self) -> Result<(), PeerError> {
        loop {
            self.stream.readable().await?;
            let stage = std::mem::replace(&mut self.stage, Box::new(ShutdownStage));
            let next = stage.advance(&mut self.stream)?;
            if next.is_shutdown() {
                return Ok(());
            }
            self.stage = next;
        }
    }
}
