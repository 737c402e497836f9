//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! ud-cli users add -n "Ada Lovelace" -e ada@example.com --role admin
//! ud-cli users update <ID> --department Research --phone ""
//! ud-cli users list --status inactive
//! ud-cli users stats
//! ```

use clap::Args;

use userdash_core::{UserId, UserStatus};
use userdash_dashboard::models::{NewUser, User, UserPatch};
use userdash_dashboard::{AppError, AppState, Notice};

use super::print_notice;

/// Profile form fields for a new user.
#[derive(Debug, Args)]
pub struct UserFields {
    /// Display name
    #[arg(short, long)]
    name: String,

    /// Contact email
    #[arg(short, long)]
    email: String,

    /// Ten-digit phone number, any punctuation
    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    address: String,

    #[arg(long)]
    role: Option<String>,

    #[arg(long)]
    department: Option<String>,

    /// Avatar URL
    #[arg(long)]
    profile_image: Option<String>,

    /// Create the user as inactive
    #[arg(long)]
    inactive: bool,
}

impl From<UserFields> for NewUser {
    fn from(f: UserFields) -> Self {
        Self {
            name: f.name,
            email: f.email,
            phone: f.phone,
            address: f.address,
            role: f.role,
            department: f.department,
            profile_image: f.profile_image,
            is_active: Some(!f.inactive),
        }
    }
}

/// Fields to change on an existing user. An empty value clears optional
/// fields.
#[derive(Debug, Args)]
pub struct PatchFields {
    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    role: Option<String>,

    #[arg(long)]
    department: Option<String>,

    #[arg(long)]
    profile_image: Option<String>,
}

impl From<PatchFields> for UserPatch {
    fn from(f: PatchFields) -> Self {
        Self {
            name: f.name,
            email: f.email,
            phone: f.phone,
            address: f.address,
            role: f.role,
            department: f.department,
            profile_image: f.profile_image,
            is_active: None,
        }
    }
}

/// Print users, optionally filtered by name and status.
#[allow(clippy::print_stdout)]
pub fn list(state: &AppState, search: Option<&str>, status: Option<UserStatus>) {
    let users = state.users();
    let mut rows = search.map_or_else(|| users.list(), |q| users.search(q));
    if let Some(status) = status {
        rows.retain(|u| u.status() == status);
    }

    if rows.is_empty() {
        println!("No users found");
        return;
    }
    println!(
        "{:<36}  {:<20}  {:<28}  {:<14}  {:<8}  UPDATED",
        "ID", "NAME", "EMAIL", "PHONE", "STATUS"
    );
    for user in &rows {
        print_row(user);
    }
}

#[allow(clippy::print_stdout)]
fn print_row(user: &User) {
    let phone = user
        .phone
        .as_ref()
        .map_or_else(|| "-".to_owned(), userdash_core::Phone::formatted);
    println!(
        "{:<36}  {:<20}  {:<28}  {:<14}  {:<8}  {}",
        user.id.as_str(),
        user.name,
        user.email.as_str(),
        phone,
        user.status().label(),
        user.updated_at
    );
}

/// Add a user from form fields.
///
/// # Errors
///
/// Returns an error if the fields fail validation or the store cannot be
/// written.
pub fn add(state: &AppState, fields: UserFields) -> userdash_dashboard::Result<()> {
    let user = state.users().create(fields.into())?;
    print_notice(&Notice::success("Success", "User added successfully"));
    print_row(&user);
    Ok(())
}

/// Apply field changes to a user.
///
/// # Errors
///
/// Returns an error if the user does not exist, the changes fail validation
/// or the store cannot be written.
pub fn update(state: &AppState, id: &str, fields: PatchFields) -> userdash_dashboard::Result<()> {
    let patch = UserPatch::from(fields);
    if patch.is_empty() {
        return Err(AppError::BadRequest("nothing to update".to_owned()));
    }
    let user = state.users().update(&UserId::new(id), patch)?;
    print_notice(&Notice::success("Success", "User updated successfully"));
    print_row(&user);
    Ok(())
}

/// Flip a user's status.
///
/// # Errors
///
/// Returns an error if the user does not exist or the store cannot be
/// written.
pub fn set_active(state: &AppState, id: &str, is_active: bool) -> userdash_dashboard::Result<()> {
    let user = state.users().set_active(&UserId::new(id), is_active)?;
    print_notice(&Notice::success(
        "Success",
        format!("{} is now {}", user.name, user.status().label()),
    ));
    Ok(())
}

/// Remove a user. Removing an unknown ID succeeds.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn remove(state: &AppState, id: &str) -> userdash_dashboard::Result<()> {
    if state.users().remove(&UserId::new(id))? {
        print_notice(&Notice::success("Success", "User deleted successfully"));
    } else {
        tracing::info!(user_id = %id, "No such user, nothing removed");
    }
    Ok(())
}

/// Print the stats cards.
#[allow(clippy::print_stdout)]
pub fn stats(state: &AppState) {
    let stats = state.users().stats();
    println!("Total users:    {}", stats.total);
    println!("Active users:   {}", stats.active);
    println!("Inactive users: {}", stats.inactive());
    println!("Last updated:   {}", stats.last_updated);
}
