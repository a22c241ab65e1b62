//! Netlify adapter
//!
//! Writes `netlify.toml` into the project and triggers a build.

mod config;
mod manifest;
mod provider;

pub use config::NetlifyConfig;
pub use manifest::{MANIFEST_FILE_NAME, render_netlify_toml};
pub use provider::NetlifyProvider;
