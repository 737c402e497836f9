//! Content entry commands.

use userdash_core::{ContentId, UserId};
use userdash_dashboard::{AppState, Notice};

use super::print_notice;

const PREVIEW_CHARS: usize = 60;

/// Print entries, optionally only those by one author.
#[allow(clippy::print_stdout)]
pub fn list(state: &AppState, user: Option<&str>) {
    let content = state.content();
    let entries = user.map_or_else(|| content.list(), |id| content.for_user(&UserId::new(id)));
    if entries.is_empty() {
        println!("No content yet");
        return;
    }
    for entry in &entries {
        println!(
            "{}  {} ({})  {}  {} words",
            entry.id,
            entry.user_name,
            entry.user_id,
            entry.last_edited,
            entry.word_count()
        );
        println!("    {}", entry.preview(PREVIEW_CHARS));
    }
}

/// Save a new entry as the signed-in user, or anonymously.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn add(state: &AppState, markup: &str) -> userdash_dashboard::Result<()> {
    let session = state.auth().current();
    let entry = state.content().save(None, session.as_ref(), markup)?;
    print_notice(&Notice::success(
        "Content saved",
        format!("{} by {}", entry.id, entry.user_name),
    ));
    Ok(())
}

/// Replace an entry's markup.
///
/// # Errors
///
/// Returns an error if the entry does not exist or the store cannot be
/// written.
pub fn edit(state: &AppState, id: &str, markup: &str) -> userdash_dashboard::Result<()> {
    let session = state.auth().current();
    let entry = state
        .content()
        .save(Some(&ContentId::new(id)), session.as_ref(), markup)?;
    print_notice(&Notice::success(
        "Content updated",
        format!("{} edited at {}", entry.id, entry.last_edited),
    ));
    Ok(())
}

/// Remove an entry. Removing an unknown ID succeeds.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn remove(state: &AppState, id: &str) -> userdash_dashboard::Result<()> {
    if state.content().remove(&ContentId::new(id))? {
        print_notice(&Notice::success("Success", "Content deleted"));
    }
    Ok(())
}
