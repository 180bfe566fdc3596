use super::channel::Channel;
use super::stage::Stage;
use crate::peer::PeerError;

/// Terminal stage: tells the event loop to close the connection.
pub struct ShutdownStage;

impl Stage for ShutdownStage {
    /// Performs no reads; repeated calls keep signalling shutdown.
    fn advance(self: Box<Self>, _channel: &mut dyn Channel) -> Result<Box<dyn Stage>, PeerError> {
        Ok(self)
    }

    fn is_shutdown(&self) -> bool {
        true
    }
}
