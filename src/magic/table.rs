//! Rule table: the ordered, append-only arena of parsed rules.
//!
//! Each rule's continuation span (the index one past its last descendant)
//! is computed at load time so the match engine can skip a failed rule's
//! whole subtree in one step.

use crate::core::MagicRule;
use crate::error::{MagicError, ParseWarning, Result};
use crate::io::SafeFileReader;
use crate::magic::parser::{continuation_level, parse_line};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// One rejected line of a rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWarning {
    pub line: usize,
    pub warning: ParseWarning,
}

/// Outcome of loading one rule source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines read, including blanks and comments.
    pub lines: usize,
    pub rules_loaded: usize,
    pub errors: usize,
    pub warnings: Vec<LineWarning>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    fn reject(&mut self, line: usize, warning: ParseWarning, source: &str) {
        warn!(source, line, %warning, "Skipping magic rule");
        self.errors += 1;
        self.warnings.push(LineWarning { line, warning });
    }
}

/// Summary counters, for logging and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub rules: usize,
    pub top_level: usize,
    pub max_level: u16,
}

/// Ordered rule sequence with precomputed continuation spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    rules: Vec<MagicRule>,
    span_ends: Vec<usize>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule file held in memory.
    pub fn parse_str(text: &str) -> (Self, LoadReport) {
        let mut table = Self::new();
        let report = table.merge_str(text);
        (table, report)
    }

    /// Load a rule file, refusing files larger than `max_size` bytes.
    pub fn load_file<P: AsRef<Path>>(path: P, max_size: u64) -> Result<(Self, LoadReport)> {
        let mut table = Self::new();
        let report = table.merge_file(path, max_size)?;
        Ok((table, report))
    }

    pub fn merge_str(&mut self, text: &str) -> LoadReport {
        self.merge_bytes(text.as_bytes(), "<memory>")
    }

    /// Append the rules of another rule file after the current ones.
    pub fn merge_file<P: AsRef<Path>>(&mut self, path: P, max_size: u64) -> Result<LoadReport> {
        let path = path.as_ref();
        let rule_file_error = |source| MagicError::RuleFile {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = SafeFileReader::open(path).map_err(rule_file_error)?;
        if reader.size() > max_size {
            return Err(MagicError::RuleFileTooLarge {
                path: path.to_path_buf(),
                limit: max_size,
                found: reader.size(),
            });
        }
        let bytes = reader.read_all(max_size).map_err(rule_file_error)?;
        let report = self.merge_bytes(&bytes, &path.display().to_string());
        info!(
            path = %path.display(),
            rules = report.rules_loaded,
            errors = report.errors,
            "Loaded magic file"
        );
        Ok(report)
    }

    /// Parse `bytes` line by line and append the accepted rules.
    ///
    /// `source` names the input in log messages.
    pub fn merge_bytes(&mut self, bytes: &[u8], source: &str) -> LoadReport {
        let mut report = LoadReport::default();
        let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
        if bytes.ends_with(b"\n") {
            lines.pop();
        }
        // Level of a rejected rule whose continuations are dropped with it.
        let mut dropped_level: Option<u16> = None;

        for (idx, raw) in lines.into_iter().enumerate() {
            let line = idx + 1;
            report.lines += 1;

            match parse_line(raw) {
                Ok(None) => {}
                Ok(Some(mut rule)) => {
                    if let Some(level) = dropped_level {
                        if rule.level > level {
                            report.reject(line, ParseWarning::OrphanContinuation, source);
                            continue;
                        }
                        dropped_level = None;
                    }
                    let previous = self.rules.last().map(|r| r.level);
                    let problem = match previous {
                        None if rule.level > 0 => Some(ParseWarning::OrphanContinuation),
                        Some(previous) if rule.level > previous + 1 => {
                            Some(ParseWarning::LevelSkip {
                                previous,
                                found: rule.level,
                            })
                        }
                        _ => None,
                    };
                    if let Some(warning) = problem {
                        dropped_level = Some(rule.level);
                        report.reject(line, warning, source);
                        continue;
                    }
                    rule.line = line;
                    self.rules.push(rule);
                    report.rules_loaded += 1;
                }
                Err(warning) => {
                    let level = continuation_level(raw);
                    dropped_level = Some(dropped_level.map_or(level, |d| d.min(level)));
                    report.reject(line, warning, source);
                }
            }
        }

        self.compute_spans();
        debug!(
            source,
            lines = report.lines,
            rules = report.rules_loaded,
            errors = report.errors,
            "Parsed magic rules"
        );
        report
    }

    fn compute_spans(&mut self) {
        let n = self.rules.len();
        self.span_ends = vec![n; n];
        let mut open: Vec<usize> = Vec::new();
        for (j, rule) in self.rules.iter().enumerate() {
            while let Some(&top) = open.last() {
                if self.rules[top].level >= rule.level {
                    self.span_ends[top] = j;
                    open.pop();
                } else {
                    break;
                }
            }
            open.push(j);
        }
    }

    pub fn rules(&self) -> &[MagicRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Index one past the last continuation of rule `index`.
    pub fn span_end(&self, index: usize) -> usize {
        self.span_ends.get(index).copied().unwrap_or(self.rules.len())
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            rules: self.rules.len(),
            top_level: self.rules.iter().filter(|r| r.level == 0).count(),
            max_level: self.rules.iter().map(|r| r.level).max().unwrap_or(0),
        }
    }
}
