//! The `Validate` trait

/// Self-check for a configuration section
///
/// The error string names the offending field so it can be surfaced
/// verbatim in a `ValidationReport` or a CLI error.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
