// Read-only HTTP query service over the best-skill snapshot.

pub mod error;
pub mod handlers;
pub mod query;
pub mod server;

pub use server::ApiServer;
