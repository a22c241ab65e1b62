//! Fastly adapter

mod config;
mod provider;
mod vcl;

pub use config::FastlyConfig;
pub use provider::FastlyProvider;
pub use vcl::{VclSnippet, generate_snippets, glob_to_regex};
