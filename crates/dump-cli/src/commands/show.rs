use dump_core::state::NoteDetailState;

use crate::commands::common::{build_client, load_profile, normalize_note_identifier};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, profile: Option<&str>) -> Result<(), CliError> {
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

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note)?);
        return Ok(());
    }

    println!("{}", note.display_title());
    println!("id:       {}", note.id);
    println!("modified: {}", note.modified_at);
    if let Some(category) = note.category_name.as_deref() {
        println!("category: {category}");
    }
    if let Some(sub_categories) = note.sub_category_names.as_ref().filter(|names| !names.is_empty()) {
        println!("sub:      {}", sub_categories.join(", "));
    }
    if let Some(tags) = note.tags.as_ref().filter(|tags| !tags.is_empty()) {
        println!("tags:     {}", tags.join(", "));
    }
    println!();
    println!("{}", note.content);
    Ok(())
}
