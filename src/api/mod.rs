pub mod client;
pub mod models;
pub mod response;

pub use client::{CompletionProvider, HttpCompletionClient};
pub use models::{ChatRequest, Completion};
