//! Vercel adapter
//!
//! Writes `vercel.json` into the project and triggers a deployment.

mod config;
mod manifest;
mod provider;

pub use config::VercelConfig;
pub use manifest::{MANIFEST_FILE_NAME, render_vercel_json, route_source, vercel_manifest};
pub use provider::VercelProvider;
