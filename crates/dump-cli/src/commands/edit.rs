use dump_core::state::NoteDetailState;

use crate::commands::common::{
    build_client, capture_editor_input_with_initial, load_profile, normalize_note_identifier,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let note_id = normalize_note_identifier(id)?;
    let context = load_profile(profile)?;
    let detail = NoteDetailState::new(build_client(&context)?, note_id.clone());
    detail.load().await;

    let snapshot = detail.snapshot();
    let Some(note) = snapshot.note else {
        return Err(snapshot
            .error
            .filter(|error| error != "Note not found.")
            .map_or(CliError::NoteNotFound(note_id), CliError::Request));
    };

    let current_title = note.title.clone().unwrap_or_default();
    let (new_title, new_content) = if title.is_none() && content.is_none() {
        let Some(edited) = capture_editor_input_with_initial(&note.content)? else {
            return Err(CliError::EmptyContent);
        };
        (current_title, edited)
    } else {
        (
            title.map_or(current_title, str::to_string),
            content.map_or_else(|| note.content.clone(), str::to_string),
        )
    };

    if !detail.can_save(&new_title, &new_content) {
        println!("No changes");
        return Ok(());
    }

    if !detail.save_edits(&new_title, &new_content).await {
        let error = detail
            .snapshot()
            .error
            .unwrap_or_else(|| "Could not save the note".to_string());
        return Err(CliError::Request(error));
    }

    println!("{}", note.id);
    Ok(())
}
