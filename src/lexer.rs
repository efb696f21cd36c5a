//! Character-level state machine that turns one line of chat text into a [`Command`].
//!
//! The scanner walks the input once, left to right, with a single space appended
//! so a token touching the end of the line is flushed like any other. Quoted
//! ("long") tokens are validated while scanning and unescaped once when they close.

use crate::command::Command;
use crate::error::{ParseError, ParseErrorKind, Result, ValidationError};
use crate::settings::Configuration;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

const SENTINEL: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsingState {
    /// Matching the literal command prefix; `matched` characters consumed so far.
    Prefix { matched: usize },
    Name,
    /// Between tokens.
    Default,
    OptionPrefix { matched: usize },
    Option,
    /// Right after the `:` of a `key:value` parameter.
    ParamConnector,
    Param,
    LongArgument { quote: char },
    LongParam { quote: char },
    EscapeLongArgument { quote: char },
    EscapeLongParam { quote: char },
    Argument,
}

/// What the main loop does after a character was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance,
    /// Hand the same character to the new state.
    Reconsume,
}

#[derive(Debug, Default)]
struct Parts {
    name: String,
    arguments: Vec<String>,
    options: BTreeSet<String>,
    parameters: BTreeMap<String, String>,
}

struct ParsingFSM {
    input: Vec<char>,
    source_len: usize,
    prefix: Vec<char>,
    option_prefix: Vec<char>,
    pos: usize,
    state: ParsingState,
    token_start: usize,
    pending_key: String,
    parts: Parts,
}

impl ParsingFSM {
    fn new(source: &str, config: &Configuration) -> Self {
        let mut input: Vec<char> = source.chars().collect();
        let source_len = input.len();
        input.push(SENTINEL);
        ParsingFSM {
            input,
            source_len,
            prefix: config.prefix.chars().collect(),
            option_prefix: config.option_prefix.chars().collect(),
            pos: 0,
            state: ParsingState::Prefix { matched: 0 },
            token_start: 0,
            pending_key: String::new(),
            parts: Parts::default(),
        }
    }

    /// Runs the machine to the end of the input.
    ///
    /// # Returns
    /// The collected name, arguments, options and parameters, or the first
    /// [`ParseError`] encountered. Nothing is returned for a failed scan.
    fn run(mut self) -> std::result::Result<Parts, ParseError> {
        while let Some(ch) = self.input.get(self.pos).copied() {
            let step = match self.state {
                ParsingState::Prefix { matched } => self.handle_prefix(ch, matched)?,
                ParsingState::Name => self.handle_name(ch),
                ParsingState::Default => self.handle_default(ch),
                ParsingState::OptionPrefix { matched } => self.handle_option_prefix(ch, matched)?,
                ParsingState::Option => self.handle_option(ch),
                ParsingState::ParamConnector => self.handle_param_connector(ch)?,
                ParsingState::Param => self.handle_param(ch),
                ParsingState::LongArgument { quote } => self.handle_long(ch, quote, false),
                ParsingState::LongParam { quote } => self.handle_long(ch, quote, true),
                ParsingState::EscapeLongArgument { quote } => self.handle_escape(ch, quote, false)?,
                ParsingState::EscapeLongParam { quote } => self.handle_escape(ch, quote, true)?,
                ParsingState::Argument => self.handle_argument(ch),
            };
            if step == Step::Advance {
                self.pos += 1;
            }
        }

        match self.state {
            // Every plain token is closed by the sentinel.
            ParsingState::Default
            | ParsingState::Name
            | ParsingState::Option
            | ParsingState::Param
            | ParsingState::Argument => {}
            ParsingState::Prefix { matched } => {
                let kind = match self.prefix.get(matched) {
                    Some(&expected) => ParseErrorKind::ExpectedPrefixChar(expected),
                    None => ParseErrorKind::SpaceAfterPrefix,
                };
                return Err(ParseError::new(self.source_len, kind));
            }
            ParsingState::OptionPrefix { .. }
            | ParsingState::ParamConnector
            | ParsingState::LongArgument { .. }
            | ParsingState::LongParam { .. }
            | ParsingState::EscapeLongArgument { .. }
            | ParsingState::EscapeLongParam { .. } => {
                debug!(
                    state = ?self.state,
                    start = self.token_start,
                    "dropping unterminated token at end of input"
                );
            }
        }

        Ok(self.parts)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.pos, kind)
    }

    fn token(&self) -> String {
        self.input[self.token_start..self.pos].iter().collect()
    }

    fn handle_prefix(&mut self, ch: char, matched: usize) -> std::result::Result<Step, ParseError> {
        match self.prefix.get(matched) {
            Some(&expected) if ch == expected => {
                self.state = ParsingState::Prefix { matched: matched + 1 };
            }
            _ if ch == ' ' => return Err(self.error(ParseErrorKind::SpaceAfterPrefix)),
            Some(&expected) => {
                return Err(self.error(ParseErrorKind::ExpectedPrefixChar(expected)));
            }
            None => {
                self.token_start = self.pos;
                self.state = ParsingState::Name;
            }
        }
        Ok(Step::Advance)
    }

    fn handle_name(&mut self, ch: char) -> Step {
        if ch == ' ' {
            self.parts.name = self.token();
            trace!(name = %self.parts.name, "name");
            self.state = ParsingState::Default;
        }
        Step::Advance
    }

    fn handle_default(&mut self, ch: char) -> Step {
        match ch {
            ' ' => {}
            c if self.option_prefix.first() == Some(&c) => {
                self.token_start = self.pos;
                self.state = ParsingState::OptionPrefix { matched: 1 };
            }
            '"' | '\'' => {
                self.token_start = self.pos + 1;
                self.state = ParsingState::LongArgument { quote: ch };
            }
            _ => {
                self.token_start = self.pos;
                self.state = ParsingState::Argument;
            }
        }
        Step::Advance
    }

    fn handle_option_prefix(
        &mut self,
        ch: char,
        matched: usize,
    ) -> std::result::Result<Step, ParseError> {
        match self.option_prefix.get(matched) {
            Some(&expected) if ch == expected => {
                self.state = ParsingState::OptionPrefix { matched: matched + 1 };
            }
            Some(_) => {
                // Not an option after all: the consumed characters start a plain argument.
                self.state = ParsingState::Argument;
                return Ok(Step::Reconsume);
            }
            None if ch == ' ' => return Err(self.error(ParseErrorKind::EmptyOption)),
            None => {
                self.token_start = self.pos;
                self.state = ParsingState::Option;
            }
        }
        Ok(Step::Advance)
    }

    fn handle_option(&mut self, ch: char) -> Step {
        match ch {
            ' ' => {
                let option = self.token();
                trace!(%option, "option");
                self.parts.options.insert(option);
                self.state = ParsingState::Default;
            }
            ':' => {
                self.pending_key = self.token();
                self.state = ParsingState::ParamConnector;
            }
            _ => {}
        }
        Step::Advance
    }

    fn handle_param_connector(&mut self, ch: char) -> std::result::Result<Step, ParseError> {
        match ch {
            ' ' => return Err(self.error(ParseErrorKind::EmptyParameterValue)),
            '"' | '\'' => {
                self.token_start = self.pos + 1;
                self.state = ParsingState::LongParam { quote: ch };
            }
            _ => {
                self.token_start = self.pos;
                self.state = ParsingState::Param;
            }
        }
        Ok(Step::Advance)
    }

    fn handle_param(&mut self, ch: char) -> Step {
        if ch == ' ' {
            let value = self.token();
            self.insert_parameter(value);
            self.state = ParsingState::Default;
        }
        Step::Advance
    }

    fn handle_long(&mut self, ch: char, quote: char, is_param: bool) -> Step {
        if ch == quote {
            let value = unescape(&self.token(), quote);
            if is_param {
                self.insert_parameter(value);
            } else {
                trace!(argument = %value, "quoted argument");
                self.parts.arguments.push(value);
            }
            self.state = ParsingState::Default;
        } else if ch == '\\' {
            self.state = if is_param {
                ParsingState::EscapeLongParam { quote }
            } else {
                ParsingState::EscapeLongArgument { quote }
            };
        }
        Step::Advance
    }

    /// Checks the character after a backslash. The escape stays in the token
    /// until [`unescape`] runs on close.
    fn handle_escape(
        &mut self,
        ch: char,
        quote: char,
        is_param: bool,
    ) -> std::result::Result<Step, ParseError> {
        if ch != '\\' && ch != quote {
            return Err(self.error(ParseErrorKind::InvalidEscape(ch)));
        }
        self.state = if is_param {
            ParsingState::LongParam { quote }
        } else {
            ParsingState::LongArgument { quote }
        };
        Ok(Step::Advance)
    }

    fn handle_argument(&mut self, ch: char) -> Step {
        if ch == ' ' {
            let argument = self.token();
            trace!(%argument, "argument");
            self.parts.arguments.push(argument);
            self.state = ParsingState::Default;
        }
        Step::Advance
    }

    fn insert_parameter(&mut self, value: String) {
        let key = std::mem::take(&mut self.pending_key);
        trace!(%key, %value, "parameter");
        self.parts.parameters.insert(key, value);
    }
}

/// Resolves the escapes of a closed quoted token.
///
/// Two whole-string passes, in this order: every `\` followed by `quote`
/// becomes a bare `quote`, then every `\\` becomes `\`.
///
/// ```
/// use chatcmd::lexer::unescape;
/// assert_eq!(unescape(r#"a\"b"#, '"'), "a\"b");
/// assert_eq!(unescape(r"a\\b", '\''), r"a\b");
/// ```
pub fn unescape(raw: &str, quote: char) -> String {
    let escaped_quote: String = ['\\', quote].iter().collect();
    raw.replace(&escaped_quote, &quote.to_string())
        .replace(r"\\", r"\")
}

/// Scans `source` with `config`.
///
/// `is_valid` is the outcome of the policy check on `config`; it is copied into
/// [`Command::passed_checks`]. When it is `false` and `config.force_parse` is off,
/// a [`ValidationError`] is returned before anything is scanned.
///
/// # Returns
/// The parsed [`Command`], or the first [`ParseError`] with the character index
/// at which it was detected.
pub fn parse(source: &str, config: &Configuration, is_valid: bool) -> Result<Command> {
    if !is_valid && !config.force_parse {
        return Err(ValidationError {
            policy: config.check_policy,
        }
        .into());
    }

    let parts = ParsingFSM::new(source, config).run()?;
    debug!(
        name = %parts.name,
        arguments = parts.arguments.len(),
        options = parts.options.len(),
        parameters = parts.parameters.len(),
        "parsed command"
    );

    Ok(Command {
        configuration: config.clone(),
        name: parts.name,
        arguments: parts.arguments,
        options: parts.options,
        parameters: parts.parameters,
        source: source.to_string(),
        passed_checks: is_valid,
    })
}
