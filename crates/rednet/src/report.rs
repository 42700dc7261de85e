//! Path reports - CSV rows and plain-text summaries of a computed route

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::TowerPath;

const REPORT_TITLE: &str = "RedNet - Shortest Path Report";

/// Export view of a shortest path
#[derive(Debug, Clone)]
pub struct PathReport<'a> {
    path: &'a TowerPath,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> PathReport<'a> {
    pub fn new(path: &'a TowerPath) -> Self {
        Self {
            path,
            generated_at: None,
        }
    }

    /// Stamp the text report with a generation time
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// `(order, tower)` rows with a 1-based order
    pub fn rows(&self) -> Vec<(usize, &str)> {
        self.path
            .towers()
            .iter()
            .enumerate()
            .map(|(i, tower)| (i + 1, tower.as_str()))
            .collect()
    }

    /// CSV with an `order,tower` header and one row per tower
    pub fn to_csv(&self) -> String {
        let mut out = String::from("order,tower\n");
        for (order, tower) in self.rows() {
            let _ = writeln!(out, "{},{}", order, csv_field(tower));
        }
        out
    }

    /// Human-readable report: endpoints, total latency and the numbered path
    pub fn to_text(&self, decimals: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", REPORT_TITLE);
        if let Some(at) = self.generated_at {
            let _ = writeln!(out, "Generated: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        out.push('\n');
        let _ = writeln!(out, "Origin: {}", self.path.origin());
        let _ = writeln!(out, "Destination: {}", self.path.destination());
        let _ = writeln!(
            out,
            "Total latency: {:.*}ms",
            decimals, self.path.cost()
        );
        out.push('\n');
        let _ = writeln!(out, "Path:");
        for (order, tower) in self.rows() {
            let _ = writeln!(out, "{}. {}", order, tower);
        }
        out
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_csv())
    }

    pub fn write_text(&self, path: impl AsRef<Path>, decimals: usize) -> std::io::Result<()> {
        std::fs::write(path, self.to_text(decimals))
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
