//! Integration tests for cdn-deploy
//!
//! These tests drive the public API against mocked vendor APIs and sites.

pub mod config_tests;
pub mod manager_tests;
pub mod performance_tests;
pub mod provider_tests;
pub mod security_scan_tests;
