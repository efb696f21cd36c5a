//! Parser configuration and the policy checks run against it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Named rule set used to judge whether a [`Configuration`] is safe to parse with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckPolicy {
    /// Only the option prefix is checked.
    #[default]
    Minimum,
    /// Tightens the prefix rule for chat platforms that collapse whitespace.
    Twitch,
}

impl CheckPolicy {
    /// Lowercase name of the policy, as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            CheckPolicy::Minimum => "minimum",
            CheckPolicy::Twitch => "twitch",
        }
    }

    /// Runs this policy's rules against `config`.
    ///
    /// The `check_policy` field of `config` itself is ignored here; see [`validate`]
    /// for the variant that honours it.
    pub fn check(self, config: &Configuration) -> bool {
        match self {
            CheckPolicy::Minimum => option_prefix_ok(&config.option_prefix),
            CheckPolicy::Twitch => {
                prefix_ok_for_twitch(&config.prefix) && option_prefix_ok(&config.option_prefix)
            }
        }
    }
}

impl fmt::Display for CheckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minimum" => Ok(CheckPolicy::Minimum),
            "twitch" => Ok(CheckPolicy::Twitch),
            other => Err(Error::Config(format!("unknown check policy '{}'", other))),
        }
    }
}

fn option_prefix_ok(option_prefix: &str) -> bool {
    !(option_prefix.is_empty()
        || option_prefix.starts_with('"')
        || option_prefix.starts_with('\'')
        || option_prefix.contains(' '))
}

fn prefix_ok_for_twitch(prefix: &str) -> bool {
    !(prefix.starts_with(' ') || prefix.contains("  "))
}

/// Settings a single parse runs with.
///
/// A value is never mutated by the parser; [`crate::Parser`] keeps one as its
/// default and replaces it wholesale through its setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Literal text every command has to start with, e.g. `!`.
    pub prefix: String,
    /// Literal text that starts an option or a `key:value` parameter, e.g. `-`.
    pub option_prefix: String,
    #[serde(default)]
    pub check_policy: CheckPolicy,
    /// Parse even when `check_policy` rejects this configuration.
    #[serde(default)]
    pub force_parse: bool,
}

impl Configuration {
    pub fn new(prefix: impl Into<String>, option_prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            option_prefix: option_prefix.into(),
            check_policy: CheckPolicy::default(),
            force_parse: false,
        }
    }

    pub fn with_policy(mut self, policy: CheckPolicy) -> Self {
        self.check_policy = policy;
        self
    }

    pub fn with_force_parse(mut self, force_parse: bool) -> Self {
        self.force_parse = force_parse;
        self
    }

    /// Reads a configuration from a TOML document.
    ///
    /// `check_policy` and `force_parse` may be omitted and fall back to their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads a configuration from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new("!", "-")
    }
}

/// Checks `config` against the policy it names itself.
///
/// Pure predicate: never fails, never logs.
pub fn validate(config: &Configuration) -> bool {
    config.check_policy.check(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix: &str, option_prefix: &str, policy: CheckPolicy) -> Configuration {
        Configuration::new(prefix, option_prefix).with_policy(policy)
    }

    #[test]
    fn test_default_configuration_is_valid() {
        let c = Configuration::default();
        assert_eq!(c.check_policy, CheckPolicy::Minimum);
        assert!(!c.force_parse);
        assert!(validate(&c));
    }

    #[test]
    fn test_bad_option_prefix_fails_under_both_policies() {
        for policy in [CheckPolicy::Minimum, CheckPolicy::Twitch] {
            assert!(!validate(&config("!", "", policy)));
            assert!(!validate(&config("!", "\"x", policy)));
            assert!(!validate(&config("!", "'x", policy)));
            assert!(!validate(&config("!", "a b", policy)));
            assert!(!validate(&config("!", "--  ", policy)));
            assert!(validate(&config("!", "--", policy)));
            assert!(validate(&config("!", "x\"", policy)));
        }
    }

    #[test]
    fn test_minimum_ignores_prefix() {
        assert!(validate(&config(" !", "-", CheckPolicy::Minimum)));
        assert!(validate(&config("a  b", "-", CheckPolicy::Minimum)));
        assert!(validate(&config("", "-", CheckPolicy::Minimum)));
    }

    #[test]
    fn test_twitch_prefix_rules() {
        assert!(!validate(&config(" !", "-", CheckPolicy::Twitch)));
        assert!(!validate(&config("a  b", "-", CheckPolicy::Twitch)));
        assert!(!validate(&config("!  ", "-", CheckPolicy::Twitch)));
        assert!(validate(&config("! ", "-", CheckPolicy::Twitch)));
        assert!(validate(&config("a b c", "-", CheckPolicy::Twitch)));
        assert!(validate(&config("!", "-", CheckPolicy::Twitch)));
    }

    #[test]
    fn test_policy_check_ignores_named_policy() {
        let c = config(" !", "-", CheckPolicy::Minimum);
        assert!(!CheckPolicy::Twitch.check(&c));
        assert!(CheckPolicy::Minimum.check(&c));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Twitch".parse::<CheckPolicy>().unwrap(), CheckPolicy::Twitch);
        assert_eq!("minimum".parse::<CheckPolicy>().unwrap(), CheckPolicy::Minimum);
        assert!("strict".parse::<CheckPolicy>().is_err());
        assert_eq!(CheckPolicy::Twitch.to_string(), "twitch");
    }

    #[test]
    fn test_from_toml_with_defaults() {
        let c = Configuration::from_toml_str("prefix = \"?\"\noption_prefix = \"--\"\n").unwrap();
        assert_eq!(c, Configuration::new("?", "--"));

        let c = Configuration::from_toml_str(
            "prefix = \"!\"\noption_prefix = \"-\"\ncheck_policy = \"twitch\"\nforce_parse = true\n",
        )
        .unwrap();
        assert_eq!(c.check_policy, CheckPolicy::Twitch);
        assert!(c.force_parse);
    }

    #[test]
    fn test_from_toml_rejects_unknown_policy() {
        let err = Configuration::from_toml_str(
            "prefix = \"!\"\noption_prefix = \"-\"\ncheck_policy = \"strict\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
