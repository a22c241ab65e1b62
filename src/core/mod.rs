//! Core CDN functionality
//!
//! - `providers`: vendor adapters behind the `CdnProvider` trait
//! - `manager`: policy generation and dispatch to the active adapter
//! - `security`: HTTP security scanner and grading
//! - `performance`: latency probing, regional simulation and monitoring loop

pub mod manager;
pub mod performance;
pub mod providers;
pub mod security;
