//! HTTP relay between image uploads and a remote classification model.
//!
//! `POST /predict` decodes the upload, forwards it as a batch of one to the
//! model server and answers with the top class and its confidence.

pub mod config;
pub mod decoder;
pub mod error;
pub mod inference;
pub mod interpreter;
pub mod labels;
pub mod models;
pub mod routes;

pub use config::RelayConfig;
pub use error::{ConfigError, RelayError};
pub use routes::RelayState;
