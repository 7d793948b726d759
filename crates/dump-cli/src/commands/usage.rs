use dump_core::state::SubscriptionSnapshot;
use dump_core::UsageApi;

use crate::commands::common::{build_client, load_profile};
use crate::error::CliError;

pub async fn run_usage(as_json: bool, profile: Option<&str>) -> Result<(), CliError> {
    let context = load_profile(profile)?;
    let client = build_client(&context)?;
    let status = client.fetch_usage_status().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let snapshot = SubscriptionSnapshot {
        status: Some(status),
        ..SubscriptionSnapshot::default()
    };
    for line in usage_lines(&snapshot) {
        println!("{line}");
    }
    Ok(())
}

pub fn usage_lines(snapshot: &SubscriptionSnapshot) -> Vec<String> {
    let Some(status) = snapshot.status.as_ref() else {
        return vec!["Usage unavailable".to_string()];
    };

    let mut lines = vec![
        format!("tier:      {}", snapshot.tier()),
        format!(
            "tokens:    {} / {} ({} remaining)",
            status.tokens_used, status.token_limit, status.tokens_remaining
        ),
        format!("usage:     {:.1}%", snapshot.usage_percentage()),
    ];
    if snapshot.is_blocked() {
        lines.push("blocked:   yes, monthly limit reached".to_string());
    }
    if let Some(reset) = snapshot.formatted_reset_date() {
        lines.push(format!("resets:    {reset}"));
    }
    if let Some(trial_end) = snapshot.formatted_trial_end() {
        lines.push(format!("trial end: {trial_end}"));
    }
    if snapshot.can_upgrade() {
        lines.push("Upgrade from the mobile app to raise your limit.".to_string());
    }
    lines
}
