// SPDX-FileCopyrightText: 2026 Grimoire contributors
// SPDX-License-Identifier: MIT

//! Command-line parsing for the `grimoire` binary.

use thiserror::Error;

pub const USAGE: &str = "\
Usage: grimoire <command> [args]

Commands:
  ingest             Unpack every pack into the database
  export [pack...]   Pack the given compendiums (all when none given) from the database
  clean              Remove orphaned documents and report database health
  summary            Show document counts per compendium and document type
  help               Show this message

Configuration is read from $GRIMOIRE_CONFIG, else ./grimoire.toml.
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ingest,
    Export { packs: Vec<String> },
    Clean,
    Summary,
    Help,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing command")]
    MissingCommand,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' takes no arguments, got '{argument}'")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },
}

fn no_arguments(command: &'static str, rest: &[String], parsed: Command) -> Result<Command, UsageError> {
    match rest.first() {
        Some(argument) => Err(UsageError::UnexpectedArgument {
            command,
            argument: argument.clone(),
        }),
        None => Ok(parsed),
    }
}

impl Command {
    /// Parse the arguments following the program name.
    pub fn parse(args: &[String]) -> Result<Self, UsageError> {
        let (command, rest) = args.split_first().ok_or(UsageError::MissingCommand)?;
        match command.as_str() {
            "ingest" => no_arguments("ingest", rest, Command::Ingest),
            "export" => Ok(Command::Export {
                packs: rest.to_vec(),
            }),
            "clean" => no_arguments("clean", rest, Command::Clean),
            "summary" => no_arguments("summary", rest, Command::Summary),
            "help" | "-h" | "--help" => Ok(Command::Help),
            other => Err(UsageError::UnknownCommand(other.to_owned())),
        }
    }
}
