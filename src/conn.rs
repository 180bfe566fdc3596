//! Incremental, non-blocking connection decoding.
//!
//! Each connection is owned by exactly one [`Stage`] at a time. The event
//! loop calls [`Stage::advance`] whenever the socket is readable and
//! replaces its stored stage with whatever comes back: the same stage
//! while a frame is incomplete, a successor once decoding moves on, or
//! the shutdown stage when the connection should be torn down. Parsing
//! state never lives anywhere but inside the active stage, so a stage can
//! be suspended and resumed across any number of partial reads.

mod channel;
mod driver;
mod handshake_receiver;
mod message_receiver;
mod shutdown;
mod stage;

pub use channel::Channel;
pub use driver::Connection;
pub use handshake_receiver::HandshakeReceiver;
pub use message_receiver::MessageReceiver;
pub use shutdown::ShutdownStage;
pub use stage::Stage;
