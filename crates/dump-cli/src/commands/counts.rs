use dump_core::state::BrowseState;
use serde_json::json;

use crate::commands::common::{build_client, format_folder_lines, load_profile};
use crate::error::CliError;

pub async fn run_counts(as_json: bool, profile: Option<&str>) -> Result<(), CliError> {
    let context = load_profile(profile)?;
    let browse = BrowseState::new(build_client(&context)?);
    browse.load_counts().await;

    let snapshot = browse.snapshot();
    if let Some(error) = snapshot.error {
        return Err(CliError::Request(error));
    }

    if as_json {
        let rows = |rows: &[dump_core::state::FolderRow]| {
            rows.iter()
                .map(|row| json!({"name": row.name, "count": row.count}))
                .collect::<Vec<_>>()
        };
        let output = json!({
            "categories": rows(&snapshot.categories),
            "date_groups": rows(&snapshot.date_groups),
            "mime_types": rows(&snapshot.mime_types),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let sections = [
        ("Categories", &snapshot.categories),
        ("Dates", &snapshot.date_groups),
        ("File types", &snapshot.mime_types),
    ];
    for (heading, rows) in sections {
        for line in format_folder_lines(heading, rows) {
            println!("{line}");
        }
    }
    Ok(())
}
