use anyhow::{Context, Result};
use argh::FromArgs;
use chatcmd::{CheckPolicy, Configuration, Parser};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Parse chat commands and print what was recognised.
/// Reads lines interactively unless a line is given on the command line.
struct Args {
    #[argh(option, short = 'c')]
    /// path to a TOML file holding prefix, option_prefix, check_policy and force_parse
    config: Option<PathBuf>,

    #[argh(option, short = 'p')]
    /// command prefix, overrides the config file
    prefix: Option<String>,

    #[argh(option, short = 'o')]
    /// option prefix, overrides the config file
    option_prefix: Option<String>,

    #[argh(option)]
    /// policy to check the configuration against: minimum or twitch
    policy: Option<CheckPolicy>,

    #[argh(switch, short = 'f')]
    /// parse even if the configuration fails its policy
    force: bool,

    #[argh(positional)]
    /// a single line to parse
    line: Option<String>,
}

impl Args {
    fn configuration(&self) -> Result<Configuration> {
        let mut config = match &self.config {
            Some(path) => Configuration::load(path)
                .with_context(|| format!("can't load config from {}", path.display()))?,
            None => Configuration::default(),
        };
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(option_prefix) = &self.option_prefix {
            config.option_prefix = option_prefix.clone();
        }
        if let Some(policy) = self.policy {
            config.check_policy = policy;
        }
        if self.force {
            config.force_parse = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args: Args = argh::from_env();
    let parser = Parser::new(args.configuration()?);

    match &args.line {
        Some(line) => {
            let cmd = parser.parse(line, None)?;
            println!("{}", cmd);
            Ok(())
        }
        None => repl(&parser),
    }
}

/// Parses every entered line until Ctrl-C or Ctrl-D.
fn repl(parser: &Parser) -> Result<()> {
    let mut rl = DefaultEditor::new().context("can't start line editor")?;
    let prompt = format!("{}> ", parser.configuration().prefix);

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str())?;
                match parser.parse(&line, None) {
                    Ok(cmd) => println!("{}", cmd),
                    Err(err) => println!("error: {}", err),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("can't read line"),
        }
    }

    Ok(())
}
