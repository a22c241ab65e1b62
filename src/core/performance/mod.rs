//! Performance probing and recurring monitoring of a deployed domain

pub mod monitor;
pub mod regions;
pub mod stats;
pub mod timing;
pub mod types;


pub use monitor::{PerformanceMonitor, threshold_alerts};
pub use regions::REGIONS;
pub use types::{EndpointTiming, PerformanceReport, PerformanceStats, RegionalResult};
