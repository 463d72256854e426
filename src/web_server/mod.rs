//! HTTP front end for the broker

pub mod error;
pub mod handlers;
pub mod server;
pub mod shutdown;


pub use error::ApiError;
pub use handlers::{AppState, MessageResponse};
pub use server::{router, WebServer};
pub use shutdown::{InFlight, ShutdownSignals};
