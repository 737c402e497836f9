//! Editor scratch buffer commands.

use userdash_dashboard::{AppState, Notice};

use super::print_notice;

/// Print the buffer, its plain text and word count.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let editor = state.editor();
    let markup = editor.load();
    if markup.is_empty() {
        println!("(empty)");
        return;
    }
    println!("{markup}");
    println!("---");
    println!("{}", editor.plain_text());
    println!("{} words", editor.word_count());
}

/// Overwrite the buffer.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn save(state: &AppState, content: &str) -> userdash_dashboard::Result<()> {
    state.editor().save(content)?;
    print_notice(&Notice::success(
        "Saved",
        format!("{} words", state.editor().word_count()),
    ));
    Ok(())
}
