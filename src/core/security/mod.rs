//! Security scanning of a deployed domain
//!
//! Ten HTTP and TLS checks scored out of 100 points:
//!
//! | check          | points |
//! |----------------|--------|
//! | ssl            | 20     |
//! | headers        | 15     |
//! | csp            | 10     |
//! | cache          | 10     |
//! | cors           | 10     |
//! | https-redirect | 10     |
//! | disclosure     | 10     |
//! | ddos           | 5      |
//! | rate-limit     | 5      |
//! | compression    | 5      |

mod checks;
pub mod csp;
pub mod grade;
pub mod scanner;
pub mod types;


pub use checks::detect_cdn;
pub use csp::parse_csp;
pub use grade::Grade;
pub use scanner::{ScanReport, SecurityScanner};
pub use types::{CheckResult, Severity, Vulnerability};
