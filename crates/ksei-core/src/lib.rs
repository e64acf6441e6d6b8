//! Client library for the KSEI AKSes securities-depository portal.
//!
//! - [`auth`]: challenge/login protocol and the single-flight token cache
//! - [`store`]: persistence of tokens across runs
//! - [`api`]: HTTP transport and fixed portal endpoints
//! - [`fetch`]: concurrent fan-out with per-task failure isolation
//! - [`KseiClient`]: everything above behind one handle

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod store;

pub use api::{ApiClient, ApiError, PortfolioCategory};
pub use auth::{AuthError, Credential, CredentialManager, Identity, Keychain};
pub use client::KseiClient;
pub use config::{ClientConfig, Config};
pub use error::{Error, Result};
pub use fetch::{FetchOutcome, FetchResults, FetchTask};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError};
