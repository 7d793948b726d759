use crate::auth::{normalize_token, ProfileTokenProvider, TokenSource, TokenStore, ID_TOKEN_ENV};
use crate::cli::AuthCommands;
use crate::commands::common::read_piped_stdin;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_auth(command: AuthCommands, profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile);

    match command {
        AuthCommands::Login { token } => {
            let raw = match token {
                Some(token) => Some(token),
                None => read_piped_stdin()?,
            };
            let token = raw
                .as_deref()
                .and_then(normalize_token)
                .ok_or_else(|| CliError::Auth("No token provided".to_string()))?;

            TokenStore::new(&profile_name)
                .save(&token)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Stored ID token for profile '{profile_name}'");
            Ok(())
        }
        AuthCommands::Status => {
            let resolved = ProfileTokenProvider::new(&profile_name)
                .resolve()
                .map_err(|error| CliError::Auth(error.to_string()))?;

            match resolved {
                Some((_, TokenSource::Environment)) => {
                    println!("Profile '{profile_name}' uses the token from {ID_TOKEN_ENV}");
                }
                Some((_, TokenSource::Keychain)) => {
                    println!("Profile '{profile_name}' has a stored ID token");
                }
                None => println!("Profile '{profile_name}' is not signed in."),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            TokenStore::new(&profile_name)
                .clear()
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
