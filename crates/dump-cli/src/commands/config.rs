use crate::cli::ConfigCommands;
use crate::config_profiles::{normalize_text_option, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            time_zone,
            page_size,
            user_id,
            no_activate,
        } => run_config_init(
            profile,
            ProfileUpdate {
                api_base_url,
                time_zone,
                page_size,
                user_id,
            },
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(profile),
    }
}

/// Values passed to `config init`; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub api_base_url: Option<String>,
    pub time_zone: Option<String>,
    pub page_size: Option<u32>,
    pub user_id: Option<String>,
}

pub fn apply_profile_update(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    update: ProfileUpdate,
    activate: bool,
) -> Result<(), CliError> {
    let profile = config.profile_mut_or_default(profile_name);
    if let Some(value) = normalize_text_option(update.api_base_url) {
        profile.api_base_url = Some(value.trim_end_matches('/').to_string());
    }
    if let Some(value) = normalize_text_option(update.time_zone) {
        profile.time_zone = Some(value);
    }
    if let Some(value) = update.page_size {
        profile.page_size = Some(value);
    }
    if let Some(value) = normalize_text_option(update.user_id) {
        profile.user_id = Some(value);
    }
    profile.validate().map_err(CliError::Config)?;

    if activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

fn run_config_init(
    profile_name: Option<&str>,
    update: ProfileUpdate,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    apply_profile_update(&mut config, &profile_name, update, !no_activate)?;

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    println!("Run `dump auth login --profile {profile_name}` to store an ID token.");
    Ok(())
}

fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let Some(profile) = config.profile(&profile_name) else {
        println!("Profile '{profile_name}' is not configured; using defaults.");
        return Ok(());
    };

    let client_config = profile.client_config();
    println!("profile:      {profile_name}");
    println!("api_base_url: {}", client_config.api_base_url);
    println!("time_zone:    {}", client_config.time_zone());
    println!("page_size:    {}", client_config.page_size());
    println!(
        "user_id:      {}",
        profile.user_id().unwrap_or_else(|| "(not set)".to_string())
    );
    Ok(())
}
