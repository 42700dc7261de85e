//! Output formatting and terminal rendering
//!
//! Handles colored terminal output for the dashboard, issue lists and routes.

use colored::Colorize;
use rednet::{DetectedIssue, IssueSeverity, NetworkSummary, TowerId, TowerPath};

/// Join tower identifiers for display
fn join_towers(towers: &[TowerId]) -> String {
    towers
        .iter()
        .map(TowerId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Output handler for terminal display
pub struct OutputHandler {
    pub decimals: usize,
}

impl OutputHandler {
    pub fn new(color: bool, decimals: usize) -> Self {
        if !color {
            colored::control::set_override(false);
        }
        Self { decimals }
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    /// Print a success message
    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    /// Print an error message
    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    /// Print a warning message
    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    /// Print the dashboard metrics
    pub fn print_dashboard(&self, summary: &NetworkSummary) {
        self.print_header("Network Dashboard");
        println!(
            "  {:<18} {}",
            "Towers:".dimmed(),
            summary.tower_count.to_string().bright_white()
        );
        println!(
            "  {:<18} {}",
            "Links:".dimmed(),
            summary.link_count.to_string().bright_white()
        );
        println!(
            "  {:<18} {}",
            "Average latency:".dimmed(),
            format!("{:.*}ms", self.decimals, summary.average_latency).bright_cyan()
        );
    }

    /// Print isolated and high-latency towers
    pub fn print_anomalies(&self, isolated: &[TowerId], high_latency: &[TowerId], threshold: f64) {
        self.print_header("Anomalies");

        if isolated.is_empty() {
            self.print_success("No isolated towers in the network.");
        } else {
            self.print_warning(&format!("Isolated towers: {}", join_towers(isolated)));
        }

        if high_latency.is_empty() {
            self.print_success("No towers with high latency detected.");
        } else {
            self.print_warning(&format!(
                "Towers with high latency (> {}ms): {}",
                threshold,
                join_towers(high_latency)
            ));
        }
    }

    /// Print the detected issues, most severe first
    pub fn print_issues(&self, issues: &[DetectedIssue]) {
        if issues.is_empty() {
            return;
        }

        self.print_header("Issues");
        for issue in issues {
            let label = match issue.severity {
                IssueSeverity::Critical => "CRITICAL".bright_red().bold(),
                IssueSeverity::Warning => "WARNING ".bright_yellow(),
            };
            println!("  {} {}", label, issue.description);
        }
    }

    /// Print connected components when the network is split
    pub fn print_components(&self, components: &[Vec<TowerId>]) {
        if components.len() <= 1 {
            return;
        }

        self.print_header(&format!("Disconnected parts ({})", components.len()));
        for (i, component) in components.iter().enumerate() {
            println!(
                "  {} {}",
                format!("{}.", i + 1).dimmed(),
                join_towers(component)
            );
        }
    }

    /// Print a computed route
    pub fn print_path(&self, path: &TowerPath) {
        self.print_header("Shortest Path");
        let route = path
            .towers()
            .iter()
            .map(|t| t.as_str().bright_white().to_string())
            .collect::<Vec<_>>()
            .join(&" ➝ ".dimmed().to_string());

        self.print_success(&format!(
            "Shortest path from {} to {}",
            path.origin(),
            path.destination()
        ));
        println!("  {}", route);
        println!(
            "  {} {}",
            "Total latency:".dimmed(),
            format!("{:.*}ms", self.decimals, path.cost()).bright_cyan()
        );
        println!(
            "  {} {}",
            "Hops:".dimmed(),
            path.hops().to_string().bright_white()
        );
    }

    /// Print file operation
    pub fn print_file_operation(&self, operation: &str, path: &str) {
        println!("{} {}", format!("{}:", operation).bright_green(), path.bright_white());
    }
}
