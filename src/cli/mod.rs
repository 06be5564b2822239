// CLI module for administrative operations requiring database access

pub mod admin;
pub mod maintenance;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Cinemet movie catalog backend
///
/// Without a subcommand the HTTP server is started.
#[derive(Parser, Debug)]
#[command(name = "cinemet")]
#[command(about = "Cinemet movie catalog backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Apply pending database migrations and exit
    Migrate,

    /// Create an account with the admin role
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        /// Generated and printed when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Recompute the cached average rating of every movie
    RecomputeAverages,
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
/// `Migrate` is handled by main before AppData exists.
///
/// # Arguments
/// * `command` - Parsed subcommand
/// * `app_data` - Application data containing all stores and services
pub async fn execute_command(command: Commands, app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate => {
            tracing::info!("Migrations already applied at startup");
        }
        Commands::CreateAdmin { email, username, password } => {
            admin::create_admin(&app_data.credential_store, &email, &username, password).await?;
        }
        Commands::RecomputeAverages => {
            maintenance::recompute_averages(&app_data.average_maintainer).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["cinemet"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_create_admin_password_is_optional() {
        let cli = Cli::try_parse_from(["cinemet", "create-admin", "--email", "root@example.com", "--username", "root"])
            .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::CreateAdmin {
                email: "root@example.com".to_string(),
                username: "root".to_string(),
                password: None,
            })
        );
    }

    #[test]
    fn test_recompute_averages_parses() {
        let cli = Cli::try_parse_from(["cinemet", "recompute-averages"]).unwrap();
        assert_eq!(cli.command, Some(Commands::RecomputeAverages));
    }
}
