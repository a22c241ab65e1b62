//! CloudFront adapter
//!
//! Distributions are managed through the XML API with SigV4-signed requests.

mod config;
mod distribution;
mod provider;
mod sigv4;

pub use config::CloudFrontConfig;
pub use distribution::{DISTRIBUTION_FILE_NAME, LAMBDA_FILE_NAME, render_distribution_xml, render_lambda_edge};
pub use provider::CloudFrontProvider;
pub use sigv4::SigV4Signer;
