use std::sync::Arc;

use chrono::{Local, NaiveDate};
use dump_core::models::{Filter, DATE_GROUP_ORDER};
use dump_core::state::NotesListState;
use tokio::task::JoinError;

use crate::cli::ListArgs;
use crate::commands::common::{
    build_client, format_note_lines, load_profile, note_to_list_item, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(args: &ListArgs, profile: Option<&str>) -> Result<(), CliError> {
    let filter = filter_from_args(args, Local::now().date_naive())?;
    let context = load_profile(profile)?;
    let client = build_client(&context)?;
    let list = Arc::new(NotesListState::new(client, filter, &context.config));

    match args.query.as_deref().map(str::trim).filter(|query| !query.is_empty()) {
        Some(query) => {
            // The debounced search refreshes once the timer fires.
            let ran = search_outcome(list.set_search_query(query).await)?;
            tracing::debug!("Search refresh ran: {}", ran);
        }
        None => list.refresh().await,
    }

    for _ in 1..args.pages {
        let snapshot = list.snapshot();
        if snapshot.error.is_some() || !snapshot.has_more {
            break;
        }
        let Some(last) = snapshot.notes.last() else {
            break;
        };
        list.load_more_if_needed(&last.id).await;
    }

    let snapshot = list.snapshot();
    if let Some(error) = snapshot.error {
        return Err(CliError::Request(error));
    }

    if args.json {
        let json_items = snapshot
            .notes
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if snapshot.notes.is_empty() {
        println!("No notes");
    } else {
        for line in format_note_lines(&snapshot.notes) {
            println!("{line}");
        }
        if snapshot.has_more {
            println!("More notes available (use --pages to fetch further)");
        }
    }

    Ok(())
}

pub fn search_outcome(result: Result<bool, JoinError>) -> Result<bool, CliError> {
    result.map_err(|error| CliError::Request(format!("Search failed: {error}")))
}

/// Maps list flags to the fixed filter of one list view.
pub fn filter_from_args(args: &ListArgs, today: NaiveDate) -> Result<Filter, CliError> {
    if let Some(limit) = args.recent {
        if limit == 0 {
            return Err(CliError::InvalidFilter(
                "--recent must be at least 1".to_string(),
            ));
        }
        return Ok(Filter::Recent { limit });
    }

    if let Some(group) = args.date_group.as_deref() {
        let group = group.trim();
        let Some(name) = DATE_GROUP_ORDER
            .iter()
            .find(|name| name.eq_ignore_ascii_case(group))
        else {
            return Err(CliError::InvalidFilter(format!(
                "Unknown date group '{group}'. Expected one of: {}",
                DATE_GROUP_ORDER.join(", ")
            )));
        };
        return Ok(Filter::date_group(*name, today));
    }

    if let Some(group) = non_blank(args.mime_group.as_deref()) {
        return Ok(Filter::ByMimeGroup(group.to_lowercase()));
    }

    if let Some(category) = args.category.as_deref() {
        let Some(name) = non_blank(Some(category)) else {
            return Err(CliError::InvalidFilter(
                "--category must not be empty".to_string(),
            ));
        };
        return Ok(Filter::ByCategory {
            name: name.to_string(),
            sub_category: non_blank(args.sub_category.as_deref()).map(str::to_string),
        });
    }

    Ok(Filter::All)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
