//! Command line interface.
//!
//! Without a subcommand the terminal client starts. Subcommands are small
//! maintenance tasks that never open the interface.

pub mod completions;

use crate::app::AppOptions;
use crate::styles::ThemeType;
use crate::utils::{get_config_path, get_log_dir};
use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "parlor", version, about = "A terminal messenger", long_about = None, disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use a different config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Never connect to the network
    #[arg(long)]
    pub offline: bool,

    /// Override the configured theme
    #[arg(long, value_parser = ["dark", "light", "nocolor"])]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clear the saved session so the next start shows the login screen
    Logout,
    /// Print the log file location
    Logs,
    /// Print the config file location
    Config,
    /// Generate shell completions
    Completions {
        /// Shell to generate for (detected from the environment if omitted)
        shell: Option<Shell>,
    },
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(get_config_path)
    }

    /// Options for the interactive client.
    ///
    /// `NO_COLOR` wins over `--theme`.
    pub fn app_options(&self) -> AppOptions {
        let theme = if std::env::var_os("NO_COLOR").is_some() {
            Some(ThemeType::NoColor)
        } else {
            self.theme.as_deref().and_then(|t| t.parse().ok())
        };
        AppOptions {
            offline: self.offline,
            theme,
        }
    }

    /// Run the selected subcommand. Does nothing without one.
    pub fn execute(self) -> Result<()> {
        let config_path = self.config_path();
        match self.command {
            Some(Commands::Logout) => {
                info!("CLI: logout command executed");
                crate::app::logout(config_path)
            }
            Some(Commands::Logs) => {
                println!("{}", get_log_dir().join("parlor.log").display());
                Ok(())
            }
            Some(Commands::Config) => {
                println!("{}", config_path.display());
                Ok(())
            }
            Some(Commands::Completions { shell }) => completions::generate(shell),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["parlor", "--offline", "--theme", "light"]);
        assert!(cli.offline);
        assert!(cli.command.is_none());
        assert_eq!(cli.theme.as_deref(), Some("light"));
    }

    #[test]
    fn test_parse_subcommand_with_config() {
        let cli = Cli::parse_from(["parlor", "logout", "--config", "/tmp/parlor.toml"]);
        assert!(matches!(cli.command, Some(Commands::Logout)));
        assert_eq!(cli.config_path(), PathBuf::from("/tmp/parlor.toml"));
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["parlor", "--theme", "pink"]).is_err());
    }
}
