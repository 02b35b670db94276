// CLI module - serve, migrate and seed commands

pub mod migrate;
pub mod seed;

use clap::{Parser, Subcommand};

/// Fashion backend server and administrative commands
#[derive(Parser, Debug)]
#[command(name = "fashion-backend")]
#[command(about = "Account, todo and activity-log API for the fashion storefront", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run migrations and start the HTTP server (default)
    Serve,

    /// Run pending migrations on the main and activity databases
    Migrate,

    /// Create the default roles and, when configured, the admin account
    Seed,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_the_default_command() {
        let cli = Cli::parse_from(["fashion-backend"]);
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn test_seed_subcommand_parses() {
        let cli = Cli::parse_from(["fashion-backend", "seed"]);
        assert_eq!(cli.command(), Commands::Seed);
    }
}
