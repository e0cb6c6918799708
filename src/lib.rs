pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod memory;
pub mod models;
pub mod relay;
pub mod server;

pub use error::{RelayError, Result, StorageError};
pub use relay::{ChatRelay, RelayReply};
