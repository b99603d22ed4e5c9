use crate::imports::*;

use clap::{Parser, Subcommand};

/*
    Types:
    * Cli - Command-line flags, with environment fallbacks
    * CliCommand - Subcommands that run instead of the chat session
    * HelperCommand - Storage maintenance helpers
    * SessionOptions - Switches every handler can read
    * AppConfig - Everything main needs to start a session
*/

const APP_DIR: &str = "assistant";

/// Console personal assistant for contacts and notes.
#[derive(Parser, Debug, Clone)]
#[command(name = "assistant", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Command line to run before reading from the console
    #[arg(env = "ASSISTANT_PREDEFINED_INPUT")]
    pub predefined_input: Option<String>,

    /// Never prompt: missing required arguments are errors
    #[arg(long, short = 'n')]
    pub non_interactive: bool,

    /// Print bare values (uids in listings) without decoration
    #[arg(long)]
    pub plain_render: bool,

    /// Echo every command before it runs
    #[arg(long)]
    pub show_commands: bool,

    /// Skip the greeting banner
    #[arg(long)]
    pub hide_intro: bool,

    /// Where data.json lives
    #[arg(long, global = true, env = "ASSISTANT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Where contacts_export writes its files
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Storage maintenance helpers
    Helpers {
        #[command(subcommand)]
        action: HelperCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HelperCommand {
    /// Show the paths used for storage and exports
    ShowPaths,

    /// Delete all stored contacts and notes
    ClearStorage,

    /// Fill the storage with generated contacts and notes
    FillStorage {
        /// Amount of records added for each type
        #[arg(long, default_value_t = 10)]
        amount: usize,

        /// Storage directory, instead of the configured data directory
        #[arg(long)]
        storage_dir: Option<PathBuf>,

        /// Only fill a section that is still empty
        #[arg(long)]
        init_only: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub non_interactive: bool,
    pub plain_render: bool,
    pub show_commands: bool,
    pub hide_intro: bool,
    pub export_dir: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            non_interactive: false,
            plain_render: false,
            show_commands: false,
            hide_intro: false,
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub options: SessionOptions,
    pub data_dir: PathBuf,
    pub predefined_input: Option<String>,
    pub command: Option<CliCommand>,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let data_dir = match cli.data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .context("no data directory on this platform, pass --data-dir")?,
        };
        let export_dir = cli
            .export_dir
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| data_dir.clone());

        Ok(Self {
            options: SessionOptions {
                non_interactive: cli.non_interactive,
                plain_render: cli.plain_render,
                show_commands: cli.show_commands,
                hide_intro: cli.hide_intro,
                export_dir,
            },
            data_dir,
            predefined_input: cli.predefined_input.filter(|input| !input.trim().is_empty()),
            command: cli.command,
        })
    }
}
