//! Error handling
//!
//! Crate-level error type. Provider adapters use
//! [`ProviderError`](crate::core::providers::error::ProviderError) and are
//! lifted into [`CdnError`] at the orchestration boundary.

mod types;

pub use types::{CdnError, Result};
