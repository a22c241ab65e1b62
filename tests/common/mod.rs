//! Common test utilities for cdn-deploy
//!
//! - Configuration fixtures rooted in a temporary directory
//! - Mocked sites served by `wiremock`
//! - Assertion macros

pub mod fixtures;
pub mod sites;

pub use fixtures::{ConfigFactory, registry_for};
pub use sites::{SiteProfile, mock_site};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
