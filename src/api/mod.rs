//! HTTP front end for the agent.

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
