//! Core library for the `skylog` weather client.
//!
//! This crate defines:
//! - The typed API client and its single-message error contract
//! - A transport abstraction over the real backend and an in-memory mock
//! - Shared domain models and on-disk configuration/session handling
//!
//! It is used by `skylog-cli`, but can also be reused by other binaries or services.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod transport;

pub use api::ApiClient;
pub use config::{Config, StoredSession};
pub use error::ApiError;
pub use model::{HealthStatus, HistoryEntry, LoginResponse, RegisterAck, WeatherReport};
pub use store::MemoryStore;
pub use transport::{Transport, http::HttpTransport, mock::MockServer};
