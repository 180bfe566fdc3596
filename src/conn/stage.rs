use super::channel::Channel;
use crate::peer::PeerError;

/// One unit of decode work in progress for a connection.
///
/// The event loop invokes [`advance`](Stage::advance) once per readiness
/// notification and stores whatever stage comes back for the next event.
/// A stage must tolerate being called with zero bytes available - that is
/// never an error, it simply returns itself unchanged. Decode failures
/// that only concern this connection route to [`super::ShutdownStage`]
/// instead of an `Err`, so the loop's dispatch is uniform across success
/// and failure; only transport-level failures (end-of-stream before a
/// handshake exists, genuine I/O errors) propagate as `Err`.
pub trait Stage: Send {
    /// Consumes whatever bytes are currently available on `channel` and
    /// returns the stage that should handle the next readiness event.
    fn advance(self: Box<Self>, channel: &mut dyn Channel) -> Result<Box<dyn Stage>, PeerError>;

    /// True when the connection should be closed instead of polled again.
    fn is_shutdown(&self) -> bool {
        false
    }
}
