/// CLI argument parsing

use clap::{Args, Parser, Subcommand};

use crate::screens::Locale;
use crate::utils::ConfigOverrides;

pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(name = "timon-dash")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
pub struct GlobalOpts {
    /// Host the services run on
    #[arg(long, global = true)]
    pub target_host: Option<String>,

    /// Seconds between polling cycles
    #[arg(short, long, global = true)]
    pub interval: Option<u64>,

    /// Per-probe timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Display language
    #[arg(long, value_enum, global = true)]
    pub lang: Option<Locale>,
}

impl GlobalOpts {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target_host: self.target_host.clone(),
            interval_secs: self.interval,
            timeout_secs: self.timeout,
            lang: self.lang,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every service once and print the result
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Run HTTP dashboard mode
    #[cfg(feature = "server")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Enable CORS for cross-origin requests
        #[arg(long)]
        cors: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    View,

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_runs_dashboard() {
        let cli = Cli::try_parse_from(["timon-dash"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.global.interval.is_none());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "timon-dash", "status", "--json", "--interval", "10", "--lang", "es",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Status { json: true })));
        let overrides = cli.global.overrides();
        assert_eq!(overrides.interval_secs, Some(10));
        assert_eq!(overrides.lang, Some(Locale::Es));
    }

    #[test]
    fn test_invalid_lang_is_rejected() {
        assert!(Cli::try_parse_from(["timon-dash", "--lang", "fr"]).is_err());
    }
}
