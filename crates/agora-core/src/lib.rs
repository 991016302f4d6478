//! # Agora Core
//!
//! The domain layer of the Agora content platform.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! role-gated access rules, the placeholder attachment locator and the
//! services that apply them against the repository ports.

pub mod access;
pub mod domain;
pub mod error;
pub mod locator;
pub mod ports;
pub mod service;

pub use access::{AccessPolicy, CreatePolicy, Requester, Visibility};
pub use error::DomainError;
pub use locator::AttachmentLocator;
