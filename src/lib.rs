//! Client for a remote YouTube audio/video conversion API.
//!
//! The remote service does all the work; this crate validates input, builds
//! the request, interprets the response and gets the resulting file to the
//! user, driven by a small explicit state machine.

pub mod client;
pub mod config;
pub mod executor;
pub mod messages;
pub mod options;
pub mod request;
pub mod response;
pub mod session;
pub mod state;
pub mod terminal;
pub mod validate;

pub use client::{ApiClient, TransportError};
pub use config::Config;
pub use executor::{DownloadError, Executor, Outcome, Progress, Strategy};
pub use options::{DownloadOptions, Mode};
pub use request::{DownloadRequest, Selection, build_request};
pub use response::DownloadResponse;
pub use session::{Finish, Presenter, Session};
pub use state::{Flavor, UiState};
