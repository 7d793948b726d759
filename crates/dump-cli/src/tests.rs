use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use clap::Parser;
use dump_core::models::{
    Filter, NotePreview, SubscriptionStatus, SubscriptionTier, UploadKind, DATE_GROUP_THIS_WEEK,
};
use dump_core::state::{FolderKind, FolderRow, SubscriptionSnapshot};
use pretty_assertions::assert_eq;

use crate::cli::{CaptureKind, Cli, Commands, CompletionShell, ListArgs};
use crate::commands::common::{
    default_editor, format_folder_lines, format_note_lines, format_relative_time,
    normalize_content, normalize_note_identifier, note_preview, note_to_list_item,
};
use crate::commands::completions::run_completions;
use crate::commands::config::{apply_profile_update, ProfileUpdate};
use crate::commands::list::{filter_from_args, search_outcome};
use crate::commands::onboard::preset_lines;
use crate::commands::upload::{kind_for_mime, upload_kind};
use crate::commands::usage::usage_lines;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 21).unwrap()
}

fn preview(id: &str, title: Option<&str>, text: &str) -> NotePreview {
    NotePreview {
        id: id.to_string(),
        title: title.map(str::to_string),
        preview_text: text.to_string(),
        modified_at: "unknown".to_string(),
        category_name: Some("Home".to_string()),
        note_type: None,
        mime_type: None,
        sub_category_names: Some(vec!["Groceries".to_string()]),
    }
}

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn normalize_content_keeps_multiline_text() {
    assert_eq!(
        normalize_content("line 1\nline 2\n"),
        Some("line 1\nline 2".to_string())
    );
}

#[test]
fn default_editor_is_defined() {
    assert!(!default_editor().is_empty());
}

#[test]
fn normalize_note_identifier_rejects_empty() {
    assert!(matches!(
        normalize_note_identifier("   "),
        Err(CliError::EmptyNoteId)
    ));
    assert_eq!(normalize_note_identifier(" 42 ").unwrap(), "42");
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(now - 3 * 24 * 60 * 60_000, now), "3d ago");
}

#[test]
fn note_preview_truncates_with_ellipsis() {
    assert_eq!(note_preview("\n  short   line \nnext", 20), "short line");
    assert_eq!(note_preview("abcdefghijklmnop", 10), "abcdefg...");
}

#[test]
fn list_items_fall_back_to_preview_and_raw_timestamp() {
    let item = note_to_list_item(&preview("7", None, "\n milk and eggs\nlater"));
    assert_eq!(item.id, "7");
    assert_eq!(item.title, "milk and eggs");
    assert_eq!(item.relative_time, "unknown");
    assert_eq!(item.category.as_deref(), Some("Home"));
    assert_eq!(item.sub_categories, vec!["Groceries".to_string()]);
}

#[test]
fn note_lines_show_category_when_present() {
    let mut uncategorized = preview("8", Some("Plain"), "");
    uncategorized.category_name = None;
    let lines = format_note_lines(&[preview("7", Some("Shopping"), ""), uncategorized]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("7 "));
    assert!(lines[0].contains("Shopping"));
    assert!(lines[0].ends_with("[Home]"));
    assert!(!lines[1].contains('['));
}

#[test]
fn folder_lines_align_counts() {
    let rows = vec![
        FolderRow {
            kind: FolderKind::Category,
            name: "Home".to_string(),
            count: 4,
        },
        FolderRow {
            kind: FolderKind::Category,
            name: "Work Stuff".to_string(),
            count: 12,
        },
    ];
    assert_eq!(
        format_folder_lines("Categories", &rows),
        vec![
            "Categories".to_string(),
            "  Home        4".to_string(),
            "  Work Stuff  12".to_string(),
        ]
    );
    assert!(format_folder_lines("Dates", &[]).is_empty());
}

#[test]
fn filter_defaults_to_all_notes() {
    assert_eq!(
        filter_from_args(&ListArgs::default(), wednesday()).unwrap(),
        Filter::All
    );
}

#[test]
fn filter_maps_category_and_sub_category() {
    let args = ListArgs {
        category: Some(" Home ".to_string()),
        sub_category: Some(" ".to_string()),
        ..ListArgs::default()
    };
    assert_eq!(
        filter_from_args(&args, wednesday()).unwrap(),
        Filter::ByCategory {
            name: "Home".to_string(),
            sub_category: None,
        }
    );

    let args = ListArgs {
        category: Some("Home".to_string()),
        sub_category: Some("Groceries".to_string()),
        ..ListArgs::default()
    };
    assert_eq!(
        filter_from_args(&args, wednesday()).unwrap(),
        Filter::ByCategory {
            name: "Home".to_string(),
            sub_category: Some("Groceries".to_string()),
        }
    );
}

#[test]
fn filter_matches_date_groups_case_insensitively() {
    let args = ListArgs {
        date_group: Some("this week".to_string()),
        ..ListArgs::default()
    };
    assert_eq!(
        filter_from_args(&args, wednesday()).unwrap(),
        Filter::ByDateRange {
            name: DATE_GROUP_THIS_WEEK.to_string(),
            start: "2026-10-19".to_string(),
            end: "2026-10-21".to_string(),
        }
    );

    let args = ListArgs {
        date_group: Some("Last Decade".to_string()),
        ..ListArgs::default()
    };
    assert!(matches!(
        filter_from_args(&args, wednesday()),
        Err(CliError::InvalidFilter(_))
    ));
}

#[test]
fn filter_maps_mime_group_and_recent() {
    let args = ListArgs {
        mime_group: Some(" Image ".to_string()),
        ..ListArgs::default()
    };
    assert_eq!(
        filter_from_args(&args, wednesday()).unwrap(),
        Filter::ByMimeGroup("image".to_string())
    );

    let args = ListArgs {
        recent: Some(5),
        ..ListArgs::default()
    };
    assert_eq!(
        filter_from_args(&args, wednesday()).unwrap(),
        Filter::Recent { limit: 5 }
    );

    let args = ListArgs {
        recent: Some(0),
        ..ListArgs::default()
    };
    assert!(filter_from_args(&args, wednesday()).is_err());
}

#[test]
fn cli_parses_list_flags_and_global_profile() {
    let cli = Cli::try_parse_from([
        "dump",
        "list",
        "--category",
        "Home",
        "--sub-category",
        "Groceries",
        "--pages",
        "2",
        "--profile",
        "work",
    ])
    .unwrap();
    assert_eq!(cli.profile.as_deref(), Some("work"));
    let Some(Commands::List(args)) = cli.command else {
        panic!("expected list command");
    };
    assert_eq!(args.category.as_deref(), Some("Home"));
    assert_eq!(args.sub_category.as_deref(), Some("Groceries"));
    assert_eq!(args.pages, 2);
}

#[test]
fn cli_rejects_conflicting_list_filters() {
    assert!(Cli::try_parse_from(["dump", "list", "--sub-category", "Groceries"]).is_err());
    assert!(
        Cli::try_parse_from(["dump", "list", "--category", "Home", "--recent", "5"]).is_err()
    );
    assert!(Cli::try_parse_from([
        "dump",
        "onboard",
        "--preset",
        "entrepreneur",
        "--category",
        "Home"
    ])
    .is_err());
}

#[test]
fn capture_kinds_follow_mime_type() {
    assert_eq!(kind_for_mime("image"), UploadKind::Photo);
    assert_eq!(kind_for_mime("audio"), UploadKind::Audio);
    assert_eq!(kind_for_mime("application"), UploadKind::File);
    assert_eq!(upload_kind(CaptureKind::Text), UploadKind::Text);
}

#[test]
fn usage_lines_summarize_status() {
    let snapshot = SubscriptionSnapshot {
        status: Some(SubscriptionStatus {
            tier: SubscriptionTier::Trial,
            tokens_used: 10,
            token_limit: 100,
            tokens_remaining: 90,
            usage_pct: 10.0,
            is_blocked: true,
            trial_ends_at: None,
            resets_at: "not a date".to_string(),
        }),
        ..SubscriptionSnapshot::default()
    };
    let lines = usage_lines(&snapshot);
    assert_eq!(lines[0], "tier:      trial");
    assert_eq!(lines[1], "tokens:    10 / 100 (90 remaining)");
    assert_eq!(lines[2], "usage:     10.0%");
    assert!(lines.iter().any(|line| line.starts_with("blocked:")));
    assert!(lines.iter().any(|line| line.starts_with("Upgrade")));

    assert_eq!(
        usage_lines(&SubscriptionSnapshot::default()),
        vec!["Usage unavailable".to_string()]
    );
}

#[test]
fn preset_lines_skip_custom_option() {
    let lines = preset_lines();
    assert!(lines.iter().any(|line| line.contains("content_creator")));
    assert!(lines.iter().any(|line| line == "Suggestions"));
    assert!(!lines.iter().any(|line| line.contains("Add custom categories")));
}

#[test]
fn profile_update_normalizes_and_activates() {
    let mut config = CliProfilesConfig {
        version: 1,
        active_profile: None,
        profiles: BTreeMap::new(),
    };
    apply_profile_update(
        &mut config,
        "work",
        ProfileUpdate {
            api_base_url: Some(" https://api.example.com/ ".to_string()),
            time_zone: Some("Europe/Berlin".to_string()),
            page_size: Some(20),
            user_id: Some("  ".to_string()),
        },
        true,
    )
    .unwrap();

    let profile = config.profile("work").unwrap();
    assert_eq!(
        profile.api_base_url.as_deref(),
        Some("https://api.example.com")
    );
    assert_eq!(profile.time_zone.as_deref(), Some("Europe/Berlin"));
    assert_eq!(profile.page_size, Some(20));
    assert_eq!(profile.user_id, None);
    assert_eq!(config.active_profile.as_deref(), Some("work"));

    let rejected = apply_profile_update(
        &mut config,
        "work",
        ProfileUpdate {
            page_size: Some(0),
            ..ProfileUpdate::default()
        },
        false,
    );
    assert!(matches!(rejected, Err(CliError::Config(_))));
}

#[test]
fn run_completions_writes_bash_script_file() {
    let output_path = std::env::temp_dir().join(format!(
        "dump-completions-test-{}.bash",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_nanos())
    ));

    run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

    let script = std::fs::read_to_string(&output_path).unwrap();
    assert!(script.contains("_dump()"));
    assert!(script.contains("complete -F _dump"));

    let _ = std::fs::remove_file(output_path);
}

#[tokio::test]
async fn failed_search_task_surfaces_as_error() {
    let failed = tokio::spawn(async {
        let result: Option<bool> = None;
        result.expect("search task died")
    })
    .await;
    let Err(CliError::Request(message)) = search_outcome(failed) else {
        panic!("expected request error");
    };
    assert!(message.starts_with("Search failed"));

    let finished = tokio::spawn(async { true }).await;
    assert!(search_outcome(finished).unwrap());
}
