//! Command-line interface for Filmoteka.

pub mod commands;

use clap::{Parser, Subcommand};

/// Filmoteka - film catalog REST service
#[derive(Parser)]
#[command(name = "filmoteka")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Write a default config file and apply database migrations
    Init,

    /// Create an admin account, or promote an existing user to admin
    CreateAdmin {
        username: String,

        /// Only used when the account does not exist yet
        #[arg(long)]
        password: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["filmoteka"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_create_admin_args() {
        let cli =
            Cli::try_parse_from(["filmoteka", "create-admin", "root", "--password", "s3cret-pw"])
                .unwrap();
        match cli.command {
            Some(Commands::CreateAdmin { username, password }) => {
                assert_eq!(username, "root");
                assert_eq!(password, "s3cret-pw");
            }
            _ => panic!("expected create-admin"),
        }
    }

    #[test]
    fn test_create_admin_requires_password() {
        assert!(Cli::try_parse_from(["filmoteka", "create-admin", "root"]).is_err());
    }
}
