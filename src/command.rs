use crate::settings::Configuration;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One parsed line of chat input.
///
/// Built in a single pass by [`crate::lexer::parse`] and never modified afterwards,
/// which is why every field is only reachable through a read-only accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub(crate) configuration: Configuration,
    pub(crate) name: String,
    pub(crate) arguments: Vec<String>,
    pub(crate) options: BTreeSet<String>,
    pub(crate) parameters: BTreeMap<String, String>,
    pub(crate) source: String,
    pub(crate) passed_checks: bool,
}

impl Command {
    /// First token after the prefix. Never empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments in order of appearance, duplicates kept.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn options(&self) -> &BTreeSet<String> {
        &self.options
    }

    /// `key:value` pairs; the last occurrence of a key wins.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.contains(option)
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// The input line, verbatim.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Snapshot of the configuration the line was parsed with.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Whether the configuration passed its policy. Only `false` for forced parses.
    pub fn passed_checks(&self) -> bool {
        self.passed_checks
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            writeln!(f, "argument[{}]: {:?}", i, arg)?;
        }
        for option in &self.options {
            writeln!(f, "option: {}", option)?;
        }
        for (key, value) in &self.parameters {
            writeln!(f, "parameter: {} = {:?}", key, value)?;
        }
        write!(f, "passed checks: {}", self.passed_checks)
    }
}
