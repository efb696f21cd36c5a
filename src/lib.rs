//! A forgiving parser for chat-style commands.
//!
//! A line such as `!ping "some text" -loud -to:'the chat'` is split into a command
//! name, positional arguments, boolean options and `key:value` parameters. The
//! markers (`!` and `-` above) are configurable through [`Configuration`], and a
//! small policy check ([`settings::validate`]) guards against marker choices that
//! would make input ambiguous.
//!
//! The main entry point is [`Parser`], which keeps a default configuration and
//! accepts a per-call override. The [`lexer`] module holds the character-level
//! state machine doing the actual work.

pub mod command;
pub mod error;
pub mod lexer;
mod parser;
pub mod settings;

pub use command::Command;
pub use error::{Error, ParseError, ParseErrorKind, Result, ValidationError};
pub use parser::{Parser, parse};
pub use settings::{CheckPolicy, Configuration};
