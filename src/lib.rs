pub mod callbacks;
pub mod cli;
pub mod config;
pub mod constants;
pub mod content;
pub mod io;
pub mod retry;
pub mod sender;
pub mod template;
pub mod transport;

// Re-export the pieces most callers need
pub use content::{markup, plain};
pub use sender::{DeliveryReport, DispatchError, Sender};
pub use transport::{Transport, TransportError};
