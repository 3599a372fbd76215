//! Condensed report for `go test` text output.
//!
//! Progress chatter (`=== RUN`, `--- PASS`, bare `PASS`) is dropped, failing
//! tests are grouped with their log lines, and per-package result lines are
//! collected into an aligned table printed last.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(ok|FAIL|\?)\s+(\S+)\s*(.*)$").expect("package regex"));
static ELAPSED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\(cached\)|\d+(?:\.\d+)?s)(?:\s|$)").expect("elapsed regex")
});
static COVERAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"coverage: ([0-9.]+%)").expect("coverage regex"));
static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("note regex"));
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:=== (?:RUN|PAUSE|CONT|NAME)\b|--- (?:PASS|SKIP):)").expect("noise regex")
});

/// Turns raw captured output into the text printed after the separator.
pub trait ReportFormatter {
    fn format(&self, raw: &str) -> String;
}

/// Formatter for the plain-text output of `go test`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoTestFormatter;

impl ReportFormatter for GoTestFormatter {
    fn format(&self, raw: &str) -> String {
        let report = parse_report(raw);
        debug!(
            failed = report.has_failures(),
            packages = report.packages.len(),
            "parsed go test output"
        );
        report.render()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PackageStatus {
    Fail,
    Ok,
    NoTests,
}

impl PackageStatus {
    fn label(self) -> &'static str {
        match self {
            PackageStatus::Fail => "FAIL",
            PackageStatus::Ok => "ok",
            PackageStatus::NoTests => "?",
        }
    }
}

/// One `ok`/`FAIL`/`?` summary line from `go test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageResult {
    pub status: PackageStatus,
    pub path: String,
    pub elapsed: Option<String>,
    pub coverage: Option<String>,
    pub note: Option<String>,
}

impl PackageResult {
    fn detail(&self) -> String {
        [&self.elapsed, &self.coverage, &self.note]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Parsed `go test` output, ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestReport {
    /// Lines that are neither noise, failures nor package results, in input order.
    pub output: Vec<String>,
    /// Each failing test's header followed by its indented detail lines.
    pub failures: Vec<Vec<String>>,
    pub packages: Vec<PackageResult>,
}

impl TestReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
            || self
                .packages
                .iter()
                .any(|pkg| pkg.status == PackageStatus::Fail)
    }

    pub fn render(&self) -> String {
        let mut sections = Vec::new();

        if !self.output.is_empty() {
            sections.push(self.output.join("\n"));
        }

        if !self.failures.is_empty() {
            let mut section = String::from("FAILURES:");
            for block in &self.failures {
                for line in block {
                    section.push('\n');
                    section.push_str(line);
                }
            }
            sections.push(section);
        }

        if !self.packages.is_empty() {
            let width = self
                .packages
                .iter()
                .map(|pkg| pkg.path.len())
                .max()
                .unwrap_or(0);
            let mut ordered: Vec<&PackageResult> = self.packages.iter().collect();
            ordered.sort_by_key(|pkg| pkg.status);

            let mut section = String::from("PACKAGES:");
            for pkg in ordered {
                let row = format!(
                    "{:<4}  {:<width$}  {}",
                    pkg.status.label(),
                    pkg.path,
                    pkg.detail()
                );
                section.push('\n');
                section.push_str(row.trim_end());
            }
            sections.push(section);
        }

        sections.join("\n\n")
    }
}

/// Split raw `go test` output into kept lines, failure blocks and package results.
pub fn parse_report(raw: &str) -> TestReport {
    let mut report = TestReport::default();
    let mut current_failure: Option<Vec<String>> = None;

    for line in raw.lines() {
        let line = line.trim_end();
        if line.is_empty() || NOISE_RE.is_match(line) {
            continue;
        }

        let indented = line.starts_with(' ') || line.starts_with('\t');
        if indented && let Some(block) = current_failure.as_mut() {
            block.push(line.to_string());
            continue;
        }
        if let Some(block) = current_failure.take() {
            report.failures.push(block);
        }

        if line.starts_with("--- FAIL:") {
            current_failure = Some(vec![line.to_string()]);
            continue;
        }
        if line == "PASS" || line == "FAIL" {
            continue;
        }
        if let Some(pkg) = parse_package_line(line) {
            report.packages.push(pkg);
            continue;
        }
        report.output.push(line.to_string());
    }

    if let Some(block) = current_failure {
        report.failures.push(block);
    }
    report
}

fn parse_package_line(line: &str) -> Option<PackageResult> {
    let caps = PACKAGE_RE.captures(line)?;
    let status = match &caps[1] {
        "ok" => PackageStatus::Ok,
        "FAIL" => PackageStatus::Fail,
        _ => PackageStatus::NoTests,
    };
    let rest = caps.get(3).map_or("", |m| m.as_str());

    Some(PackageResult {
        status,
        path: caps[2].to_string(),
        elapsed: ELAPSED_RE.captures(rest).map(|c| c[1].to_string()),
        coverage: COVERAGE_RE.captures(rest).map(|c| c[1].to_string()),
        note: NOTE_RE.find(rest).map(|m| m.as_str().to_string()),
    })
}
