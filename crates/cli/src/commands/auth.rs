//! Mock sign-in commands.
//!
//! Sessions persist in the store, so `whoami` in a later run still sees
//! the last sign-in until `logout`.

use secrecy::SecretString;

use userdash_dashboard::models::Session;
use userdash_dashboard::services::auth::GOOGLE_ACCOUNTS;
use userdash_dashboard::{AppState, Notice};

use super::print_notice;

/// Sign in with email and password.
///
/// # Errors
///
/// Returns an error if either field is blank or the session cannot be saved.
pub async fn login(state: &AppState, email: &str, password: String) -> userdash_dashboard::Result<()> {
    let password = SecretString::from(password);
    let session = state.auth().login(email, &password).await?;
    print_notice(&Notice::success(
        "Login successful",
        format!("Welcome {}!", session.email),
    ));
    Ok(())
}

/// Sign in with a Google account from the picker.
///
/// # Errors
///
/// Returns an error if the email is malformed, the name is blank or the
/// session cannot be saved.
pub async fn google(
    state: &AppState,
    email: Option<&str>,
    display_name: &str,
) -> userdash_dashboard::Result<()> {
    let [first_account, ..] = GOOGLE_ACCOUNTS;
    let email = email.unwrap_or(first_account);
    let session = state.auth().login_with_google(email, display_name).await?;
    print_notice(&Notice::success(
        "Google Sign-In Successful",
        format!("Welcome {}!", session.name),
    ));
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns an error if any field is blank or the session cannot be saved.
pub async fn sign_up(
    state: &AppState,
    name: &str,
    email: &str,
    password: String,
) -> userdash_dashboard::Result<()> {
    let password = SecretString::from(password);
    let session = state.auth().sign_up(name, email, &password).await?;
    print_notice(&Notice::success(
        "Sign-up successful",
        format!("Welcome {}!", session.email),
    ));
    Ok(())
}

/// One-click Google sign-up.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
pub async fn sign_up_with_google(state: &AppState) -> userdash_dashboard::Result<()> {
    let session = state.auth().sign_up_with_google().await?;
    print_notice(&Notice::success(
        "Google Sign-Up Successful",
        format!("Welcome {}!", session.email),
    ));
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns an error if the persisted session cannot be removed.
pub fn logout(state: &AppState) -> userdash_dashboard::Result<()> {
    state.auth().logout()?;
    print_notice(&Notice::success("Signed out", "See you soon"));
    Ok(())
}

/// Print the signed-in session.
#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    match state.auth().current() {
        Some(Session {
            id,
            name,
            email,
            photo_url,
        }) => {
            println!("{name} <{email}>");
            println!("  id:     {id}");
            println!("  avatar: {photo_url}");
        }
        None => println!("Not signed in"),
    }
}
