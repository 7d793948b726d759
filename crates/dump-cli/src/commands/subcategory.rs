use dump_core::models::SubCategoryRequest;
use dump_core::NotesApi;

use crate::cli::SubCategoryCommands;
use crate::commands::common::{build_client, load_profile};
use crate::error::CliError;

pub async fn run_sub_category(
    command: SubCategoryCommands,
    profile: Option<&str>,
) -> Result<(), CliError> {
    match command {
        SubCategoryCommands::Add {
            category,
            name,
            description,
            keywords,
        } => {
            let request = SubCategoryRequest::from_input(
                &category,
                &name,
                description.as_deref(),
                keywords.as_deref(),
            );
            let context = load_profile(profile)?;
            let client = build_client(&context)?;
            client.create_sub_category(&request).await?;
            println!(
                "Created sub-category '{}' under '{}'",
                request.sub_cat_name, request.category_name
            );
            Ok(())
        }
    }
}
