// SPDX-License-Identifier: MPL-2.0
//! Command-line parsing.

use super::library::ListSelection;
use std::ffi::OsString;

pub const USAGE: &str = "\
wallswap - rotate desktop wallpapers from a local or online list

USAGE:
    wallswap [COMMAND] [OPTIONS]

COMMANDS:
    run                     Interactive mode (default): n, p, c, s, q
    next [--apply]          Move to the next wallpaper
    current                 Check the current wallpaper
    apply                   Apply the current wallpaper
    add <PATH|URL>...       Add files or directories to the list
    remove <SOURCE> [--delete]
                            Remove an entry, optionally trashing its file
    clear                   Remove every entry
    list                    Print the entries of the list
    sync                    Update the online list from the repository
    refresh                 Discard the downloaded online data and fetch it again

OPTIONS:
    --list <local|online>   List to use (default from settings)
    --data-dir <DIR>        Override the data directory
    --config-dir <DIR>      Override the config directory
    -v, --verbose           Debug logging
    -h, --help              Print this help
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run,
    Next { apply: bool },
    Current,
    Apply,
    Add(Vec<String>),
    Remove { source: String, delete: bool },
    Clear,
    List,
    Sync,
    Refresh,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: CliCommand,
    pub list: Option<ListSelection>,
    pub data_dir: Option<String>,
    pub config_dir: Option<String>,
    pub verbose: bool,
}

fn failed(cause: impl Into<String>) -> pico_args::Error {
    pico_args::Error::ArgumentParsingFailed {
        cause: cause.into(),
    }
}

impl Cli {
    /// Parses process arguments (without the program name).
    ///
    /// # Errors
    ///
    /// Returns a [`pico_args::Error`] for unknown commands or options and for
    /// missing or extra arguments.
    pub fn parse(mut args: pico_args::Arguments) -> Result<Self, pico_args::Error> {
        let help = args.contains(["-h", "--help"]);
        let subcommand = args.subcommand()?;
        let verbose = args.contains(["-v", "--verbose"]);
        let list = args.opt_value_from_str("--list")?;
        let data_dir = args.opt_value_from_str("--data-dir")?;
        let config_dir = args.opt_value_from_str("--config-dir")?;
        let apply = args.contains("--apply");
        let delete = args.contains("--delete");

        let mut free = Vec::new();
        for arg in args.finish() {
            let arg = arg.into_string().map_err(|_| pico_args::Error::NonUtf8Argument)?;
            if arg.starts_with('-') {
                return Err(failed(format!("unknown option '{arg}'")));
            }
            free.push(arg);
        }

        let command = if help {
            CliCommand::Help
        } else {
            match subcommand.as_deref() {
                None | Some("run") => CliCommand::Run,
                Some("next") => CliCommand::Next { apply },
                Some("current") => CliCommand::Current,
                Some("apply") => CliCommand::Apply,
                Some("add") if free.is_empty() => return Err(failed("add needs at least one path")),
                Some("add") => CliCommand::Add(std::mem::take(&mut free)),
                Some("remove") => match free.len() {
                    1 => CliCommand::Remove {
                        source: free.remove(0),
                        delete,
                    },
                    _ => return Err(failed("remove needs exactly one source")),
                },
                Some("clear") => CliCommand::Clear,
                Some("list") => CliCommand::List,
                Some("sync") => CliCommand::Sync,
                Some("refresh") => CliCommand::Refresh,
                Some("help") => CliCommand::Help,
                Some(other) => return Err(failed(format!("unknown command '{other}'"))),
            }
        };

        if !free.is_empty() {
            return Err(failed(format!("unexpected argument '{}'", free[0])));
        }

        Ok(Self {
            command,
            list,
            data_dir,
            config_dir,
            verbose,
        })
    }

    /// Parses the arguments of the running process.
    ///
    /// # Errors
    ///
    /// See [`Cli::parse`].
    pub fn from_env() -> Result<Self, pico_args::Error> {
        Self::parse(pico_args::Arguments::from_env())
    }

    /// Parses an explicit argument list.
    ///
    /// # Errors
    ///
    /// See [`Cli::parse`].
    pub fn from_args<I, S>(args: I) -> Result<Self, pico_args::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self::parse(pico_args::Arguments::from_vec(
            args.into_iter().map(Into::into).collect(),
        ))
    }
}
