// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tether Store
//!
//! State owned by the embedding host.
//!
//! - **ParamsSlot**: The single shared integration-params record, observable
//!   through a watch channel
//! - **Config**: User configuration persisted as JSON
//!
//! ## Usage
//!
//! ```ignore
//! use tether_store::{Config, ParamsSlot};
//!
//! let config = Config::load()?;
//! let slot = ParamsSlot::new();
//!
//! let mut rx = slot.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Params: {:?}", *rx.borrow());
//! }
//! ```

pub mod config;
pub mod error;
pub mod params;

pub use config::{BackendConfig, Config, GeneralConfig, WindowConfig, default_config_dir};
pub use error::StoreError;
pub use params::ParamsSlot;
