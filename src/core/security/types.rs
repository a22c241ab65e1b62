//! Scan result records

use serde::{Deserialize, Serialize};

/// Ad hoc severity attached by each check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Free-text finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub description: String,
    pub severity: Severity,
}

impl Vulnerability {
    pub fn new(id: &str, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            description: description.into(),
            severity,
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub score: f64,
    pub max_score: f64,
    pub passed: bool,
    pub details: serde_json::Value,
    #[serde(skip)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(skip)]
    pub recommendations: Vec<String>,
}

impl CheckResult {
    pub fn new(name: &str, max_score: f64) -> Self {
        Self {
            name: name.to_string(),
            score: 0.0,
            max_score,
            passed: false,
            details: serde_json::Value::Null,
            vulnerabilities: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Add points, never exceeding the maximum
    pub fn award(&mut self, points: f64) {
        self.score = (self.score + points).min(self.max_score);
    }

    pub fn vulnerability(&mut self, id: &str, description: impl Into<String>, severity: Severity) {
        self.vulnerabilities.push(Vulnerability::new(id, description, severity));
    }

    pub fn recommend(&mut self, recommendation: impl Into<String>) {
        self.recommendations.push(recommendation.into());
    }

    /// Finish the check: passed when no vulnerability of medium or higher severity was found
    pub fn finish(mut self, details: serde_json::Value) -> Self {
        self.score = self.score.clamp(0.0, self.max_score);
        self.passed = !self
            .vulnerabilities
            .iter()
            .any(|v| v.severity >= Severity::Medium);
        self.details = details;
        self
    }

    /// A check that could not run at all
    pub fn errored(name: &str, max_score: f64, id: &str, error: impl std::fmt::Display) -> Self {
        let mut result = Self::new(name, max_score);
        result.vulnerability(id, format!("{} check failed: {}", name, error), Severity::Medium);
        result.finish(serde_json::json!({"error": error.to_string()}))
    }
}
