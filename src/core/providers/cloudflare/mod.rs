//! Cloudflare adapter
//!
//! Zone settings, page rules and an optional edge worker.

mod config;
mod provider;
mod worker;

pub use config::CloudflareConfig;
pub use provider::CloudflareProvider;
pub use worker::{WORKER_FILE_NAME, render_worker_script};
