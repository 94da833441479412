//! Common utilities and shared types for wputils.
//!
//! - **Configuration**: runtime settings via [`Settings`]
//! - **Error handling**: unified error types via [`WpError`] and [`WpResult`]
//! - **Logging**: tracing subscriber setup via [`logging::init`]
//!
//! # Example
//!
//! ```no_run
//! use wputils_common::{Settings, WpResult};
//!
//! fn example() -> WpResult<()> {
//!     let settings = Settings::load()?;
//!     wputils_common::logging::init(&settings.logging);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{LoggingSettings, PhotonSettings, Settings};
pub use error::{WpError, WpResult};
