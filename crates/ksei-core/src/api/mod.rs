//! REST API client module for the KSEI AKSes service.
//!
//! This module provides the `ApiClient` transport used for the login
//! protocol and for authenticated portfolio requests, plus the fixed
//! endpoint paths of the portal.
//!
//! The portal issues JWT bearer tokens from its login endpoint; every data
//! endpoint requires one.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod user_agent;

pub use client::ApiClient;
pub use endpoints::PortfolioCategory;
pub use error::ApiError;
