use std::sync::Arc;

use dump_core::presets::{ALL_DOMAINS, ALL_PRESETS};
use dump_core::state::OnboardingState;
use dump_core::storage::FileOnboardingStore;

use crate::cli::OnboardArgs;
use crate::commands::common::{build_client, load_profile};
use crate::config_profiles::onboarding_flags_path;
use crate::error::CliError;

pub async fn run_onboard(args: &OnboardArgs, profile: Option<&str>) -> Result<(), CliError> {
    if args.list || (args.preset.is_none() && args.category.is_empty()) {
        for line in preset_lines() {
            println!("{line}");
        }
        return Ok(());
    }

    let context = load_profile(profile)?;
    let store = Arc::new(FileOnboardingStore::new(onboarding_flags_path()));
    let onboarding = OnboardingState::new(build_client(&context)?, store, context.user_scope());

    if onboarding.has_completed_onboarding().await {
        println!("Onboarding already completed for '{}'", context.name);
        return Ok(());
    }

    let submitted = if let Some(preset_id) = args.preset.as_deref() {
        if !onboarding.select_preset(preset_id.trim()) {
            return Err(CliError::Onboarding(format!(
                "Unknown preset '{}'",
                preset_id.trim()
            )));
        }
        onboarding.submit_preset().await
    } else {
        for name in &args.category {
            if !onboarding.add_category(name) {
                tracing::warn!("Skipping category '{}'", name.trim());
            }
        }
        if args.skip_definitions {
            onboarding.skip_definitions().await
        } else {
            onboarding.submit_custom_categories().await
        }
    };

    let snapshot = onboarding.snapshot();
    if !submitted {
        return Err(CliError::Onboarding(
            snapshot
                .error
                .unwrap_or_else(|| "Could not save categories".to_string()),
        ));
    }

    let names = snapshot
        .categories
        .iter()
        .map(|category| category.name.as_str())
        .collect::<Vec<_>>();
    println!("Saved {} categories: {}", names.len(), names.join(", "));
    Ok(())
}

pub fn preset_lines() -> Vec<String> {
    let mut lines = vec!["Presets".to_string()];
    for preset in ALL_PRESETS.iter().filter(|preset| !preset.is_custom_option) {
        lines.push(format!("  {:<16}  {}", preset.id, preset.title));
        lines.push(format!("  {:<16}  {}", "", preset.preview_text));
    }
    lines.push("Suggestions".to_string());
    for domain in &ALL_DOMAINS {
        lines.push(format!("  {}: {}", domain.name, domain.suggestions.join(", ")));
    }
    lines
}
