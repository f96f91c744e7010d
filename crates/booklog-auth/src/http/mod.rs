//! Axum HTTP handlers for the token endpoints.
//!
//! - `POST /token/refresh` - [`refresh_handler`]
//! - `POST /token/logout` - [`logout_handler`]
//! - `POST /dev/token/{idx}` - [`issue_handler`], development only

pub mod error;
pub mod token;

pub use error::status_code;
pub use token::{TokenState, issue_handler, logout_handler, refresh_handler};
