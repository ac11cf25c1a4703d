//! # fieldform-server
//!
//! Serves a descriptor store over HTTP with axum:
//!
//! | Method | Path | Effect |
//! |---|---|---|
//! | `GET` | `/api/form-fields` | the descriptor list as a JSON array |
//! | `PUT`, `POST` | `/api/form-fields` | replace the list, `{"success": true}` |
//! | `POST` | `/api/form-fields/validate` | validate `{"values": {...}}` against the list |
//!
//! Errors are JSON bodies of the form `{"error": "..."}` with the status
//! [`FormError::status_code`](fieldform_core::FormError::status_code) picks.

pub mod api;
pub mod server;

pub use api::{router, AppState};
pub use server::FieldformApp;
