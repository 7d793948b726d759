use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use dump_core::config::ClientConfig;
use dump_core::models::NotePreview;
use dump_core::state::FolderRow;
use dump_core::DumpClient;
use serde::Serialize;

use crate::auth::ProfileTokenProvider;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Resolved profile for one command invocation.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    pub name: String,
    pub profile: CliProfile,
    pub config: ClientConfig,
}

impl ProfileContext {
    /// Scope for per-user local flags; the profile name when no user id is set.
    pub fn user_scope(&self) -> String {
        self.profile.user_id().unwrap_or_else(|| self.name.clone())
    }
}

pub fn load_profile(explicit: Option<&str>) -> Result<ProfileContext, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = config.resolve_profile_name(explicit);
    let profile = config.profile(&name).cloned().unwrap_or_default();
    let client_config = profile.client_config();
    Ok(ProfileContext {
        name,
        profile,
        config: client_config,
    })
}

/// API client for the profile. Fails early when no token is available.
pub fn build_client(context: &ProfileContext) -> Result<Arc<DumpClient>, CliError> {
    let provider = ProfileTokenProvider::new(&context.name);
    let token = provider
        .resolve()
        .map_err(|error| CliError::Auth(error.to_string()))?;
    if token.is_none() {
        return Err(CliError::NotSignedIn(context.name.clone()));
    }
    tracing::debug!(
        "Using profile '{}' against {}",
        context.name,
        context.config.api_base_url
    );
    Ok(Arc::new(DumpClient::new(&context.config, Arc::new(provider))?))
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub modified_at: String,
    pub relative_time: String,
    pub category: Option<String>,
    pub sub_categories: Vec<String>,
}

pub fn note_to_list_item(note: &NotePreview) -> NoteListItem {
    NoteListItem {
        id: note.id.clone(),
        title: note.display_title(),
        preview: note_preview(&note.preview_text, 80),
        modified_at: note.modified_at.clone(),
        relative_time: relative_time_for(note),
        category: note.category_name.clone(),
        sub_categories: note.sub_category_names.clone().unwrap_or_default(),
    }
}

pub fn format_note_lines(notes: &[NotePreview]) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let short_id = note.id.chars().take(13).collect::<String>();
            let title = note_preview(&note.display_title(), 40);
            let relative_time = relative_time_for(note);
            match note.category_name.as_deref().filter(|name| !name.is_empty()) {
                Some(category) => {
                    format!("{short_id:<13}  {title:<40}  {relative_time:<10}  [{category}]")
                }
                None => format!("{short_id:<13}  {title:<40}  {relative_time}"),
            }
        })
        .collect()
}

pub fn format_folder_lines(heading: &str, rows: &[FolderRow]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    let width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0);
    let mut lines = vec![heading.to_string()];
    lines.extend(
        rows.iter()
            .map(|row| format!("  {:<width$}  {}", row.name, row.count)),
    );
    lines
}

fn relative_time_for(note: &NotePreview) -> String {
    note.modified_at_parsed().map_or_else(
        || note.modified_at.clone(),
        |modified| format_relative_time(modified.timestamp_millis(), Utc::now().timestamp_millis()),
    )
}

pub fn note_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Quick-capture text from arguments, then piped stdin, then `$EDITOR`.
pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input_with_initial("")? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(CliError::EditorFailed(format!(
            "`{editor}` exited with status {status}"
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let status = Command::new(program).args(parts).arg(file_path).status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("dump-note-{}-{now}.md", std::process::id()))
}
