use crate::command::Command;
use crate::error::Result;
use crate::lexer;
use crate::settings::{self, CheckPolicy, Configuration};
use tracing::warn;

/// A reusable command parser holding a default [`Configuration`].
///
/// The stored configuration is only ever replaced as a whole, either through
/// [`Parser::set_configuration`] or one of the field setters. A per-call override
/// passed to [`Parser::parse`] never touches it.
///
/// Example
/// ```
/// use chatcmd::{Configuration, Parser};
/// let parser = Parser::new(Configuration::new("!", "-"));
/// let cmd = parser.parse("!so streamer -raid -delay:30", None).unwrap();
/// assert_eq!(cmd.name(), "so");
/// assert_eq!(cmd.arguments(), ["streamer"]);
/// assert!(cmd.has_option("raid"));
/// assert_eq!(cmd.parameter("delay"), Some("30"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: Configuration,
}

impl Parser {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }

    /// The stored default configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn set_configuration(&mut self, config: Configuration) {
        self.config = config;
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.config = Configuration {
            prefix: prefix.into(),
            ..self.config.clone()
        };
    }

    pub fn set_option_prefix(&mut self, option_prefix: impl Into<String>) {
        self.config = Configuration {
            option_prefix: option_prefix.into(),
            ..self.config.clone()
        };
    }

    pub fn set_check_policy(&mut self, policy: CheckPolicy) {
        self.config = self.config.clone().with_policy(policy);
    }

    pub fn set_force_parse(&mut self, force_parse: bool) {
        self.config = self.config.clone().with_force_parse(force_parse);
    }

    /// Parses one line of input.
    ///
    /// `config` replaces the stored configuration for this call only. The
    /// effective configuration is checked against its policy before scanning.
    ///
    /// # Errors
    /// [`crate::Error::Validation`] if the policy rejects the configuration and
    /// `force_parse` is off, [`crate::Error::Parse`] if the line is malformed.
    pub fn parse(&self, source: &str, config: Option<&Configuration>) -> Result<Command> {
        let config = config.unwrap_or(&self.config);
        let is_valid = settings::validate(config);
        if !is_valid && config.force_parse {
            warn!(
                policy = %config.check_policy,
                "configuration failed its policy check, parsing anyway"
            );
        }
        lexer::parse(source, config, is_valid)
    }
}

/// Parses `source` with `config` in one go.
///
/// Equivalent to `Parser::new(config.clone()).parse(source, None)`.
pub fn parse(source: &str, config: &Configuration) -> Result<Command> {
    Parser::default().parse(source, Some(config))
}
