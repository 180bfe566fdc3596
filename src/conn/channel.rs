use std::io;
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// A non-blocking byte channel to a remote peer.
///
/// Both operations follow socket conventions: `try_read` returns `Ok(0)`
/// at end of stream and `ErrorKind::WouldBlock` when no bytes are
/// available right now; `try_write` reports however many bytes the
/// transport accepted without blocking.
pub trait Channel {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

impl Channel for TcpStream {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        TcpStream::try_read(self, buf)
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
        TcpStream::try_write(self, buf)
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::peer_addr(self)
    }
}
