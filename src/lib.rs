//! Client and generation controller for the Pollinations image API.
//!
//! ```no_run
//! use pollinate::{ClientConfig, GenerationController, GenerationParameters, LogNotifier, PollinationsClient};
//! use std::sync::Arc;
//!
//! # async fn run() -> pollinate::Result<()> {
//! let client = PollinationsClient::new(&ClientConfig::from_env())?;
//! let controller = GenerationController::with_client(client, Arc::new(LogNotifier));
//! controller.submit(&GenerationParameters::new("a red cube")).await?;
//! controller.download(std::path::Path::new(".")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod download;
pub mod error;
pub mod logger;
pub mod models;
pub mod notify;
pub mod pollinations;

pub use config::ClientConfig;
pub use controller::{GenerationController, Phase, SubmitOutcome};
pub use error::{PollinationsError, Result};
pub use models::*;
pub use notify::{ChannelNotifier, LogNotifier, Notifier};
pub use pollinations::{BuiltRequest, ImageFetcher, PollinationsClient, RequestBuilder};
