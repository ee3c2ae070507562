//! Todo list view model kept in step with a REST todo service.
//!
//! # Overview
//! `TodoListStore` owns the in-memory list, the new-item input, and the
//! editing cursor. Every mutation goes to the server first; the server's
//! response then replaces local state (the server is authoritative). Failed
//! calls are logged and leave the view untouched.
//!
//! # Design
//! - `TodoClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`, so the I/O boundary is explicit.
//! - A `Transport` performs the round-trip. `ReqwestTransport` does real
//!   HTTP; `ScriptedTransport` replays canned responses.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{EditState, ListState, TodoListStore};
pub use transport::{ReqwestTransport, ScriptedTransport, Transport};
pub use types::{CreateTodo, DraftItem, TodoId, TodoItem, UpdateTodo};
