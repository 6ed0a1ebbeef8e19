//! # LMN Backend
//!
//! Implementations of the collaborator traits declared in `lmn-core`:
//! - [`HttpBackend`], [`HttpRegistry`] and [`HttpEhrConnector`] talk to the REST backend
//! - [`StaticTokenAuth`] supplies a bearer token resolved at startup
//! - [`MockBackend`] serves the built-in demo catalogue without a network

mod auth;
mod client;
mod ehr;
mod http;
mod mock;
mod registry;

pub use auth::StaticTokenAuth;
pub use client::ApiClient;
pub use ehr::HttpEhrConnector;
pub use http::HttpBackend;
pub use mock::MockBackend;
pub use registry::HttpRegistry;
