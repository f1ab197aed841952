//! HTTP front end for the headline scorer.
//!
//! - `GET /status` → `{"status": "OK"}`
//! - `POST /score_headlines` with `{"headlines": [...]}` → `{"labels": [...]}`
//!
//! Errors come back as `{"detail": "..."}`: 422/400 for malformed bodies,
//! 500 when embedding or classification fails.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, serve, start_server};
pub use state::ServerState;
