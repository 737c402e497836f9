//! User and content repositories over a file-backed store.

#![allow(clippy::unwrap_used)]

use userdash_core::UserId;
use userdash_dashboard::db::RepositoryError;
use userdash_dashboard::models::{NewUser, User, UserPatch};
use userdash_dashboard::store::keys;
use userdash_integration_tests::TestContext;

fn new_user(name: &str, active: bool) -> NewUser {
    NewUser {
        is_active: Some(active),
        ..NewUser::new(name, format!("{}@example.com", name.to_lowercase()))
    }
}

fn assert_stats_match_list(ctx: &TestContext) {
    let users = ctx.state.users().list();
    let stats = ctx.state.users().stats();
    assert_eq!(stats.total, users.len());
    assert_eq!(stats.active, users.iter().filter(|u| u.is_active).count());
}

#[test]
fn test_create_round_trips_through_file() {
    let ctx = TestContext::new().unwrap();
    let created = ctx
        .state
        .users()
        .create(NewUser {
            phone: "555-123-4567".to_owned(),
            address: "1 Analytical Way".to_owned(),
            role: Some("admin".to_owned()),
            ..NewUser::new("Ada", "ada@example.com")
        })
        .unwrap();

    let reopened = ctx.open_another();
    let users = reopened.users().list();
    assert_eq!(users, vec![created.clone()]);
    assert_eq!(created.created_at, created.updated_at);
    assert!(created.is_active);
}

#[test]
fn test_update_after_create_strictly_increases_updated_at() {
    let ctx = TestContext::new().unwrap();
    let users = ctx.state.users();
    let user = users.create(new_user("Ada", true)).unwrap();

    let mut previous = user.updated_at;
    for name in ["Ada L", "Ada Lovelace", "Countess"] {
        let updated = users
            .update(
                &user.id,
                UserPatch {
                    name: Some(name.to_owned()),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert!(updated.updated_at > previous);
        assert!(updated.updated_at > updated.created_at);
        previous = updated.updated_at;
    }
}

#[test]
fn test_double_remove_is_idempotent() {
    let ctx = TestContext::new().unwrap();
    let users = ctx.state.users();
    let a = users.create(new_user("A", true)).unwrap();
    users.create(new_user("B", true)).unwrap();

    assert!(users.remove(&a.id).unwrap());
    let once = ctx.read_raw(keys::USERS).unwrap();
    assert!(!users.remove(&a.id).unwrap());
    assert_eq!(ctx.read_raw(keys::USERS).unwrap(), once);
}

#[test]
fn test_stats_agree_with_list_after_every_mutation() {
    let ctx = TestContext::new().unwrap();
    let users = ctx.state.users();
    assert_stats_match_list(&ctx);

    let a = users.create(new_user("A", true)).unwrap();
    assert_stats_match_list(&ctx);
    let b = users.create(new_user("B", false)).unwrap();
    assert_stats_match_list(&ctx);
    users.set_active(&b.id, true).unwrap();
    assert_stats_match_list(&ctx);
    users.set_active(&a.id, false).unwrap();
    assert_stats_match_list(&ctx);
    users.remove(&a.id).unwrap();
    assert_stats_match_list(&ctx);
}

#[test]
fn test_one_active_one_inactive() {
    let ctx = TestContext::new().unwrap();
    let users = ctx.state.users();
    users.create(new_user("A", true)).unwrap();
    users.create(new_user("B", false)).unwrap();

    let stats = users.stats();
    assert_eq!((stats.total, stats.active), (2, 1));
    assert_eq!(stats.inactive(), 1);
}

#[test]
fn test_sequential_disjoint_patches_from_two_views_both_apply() {
    let ctx = TestContext::new().unwrap();
    let other = ctx.share_store();
    let user = ctx.state.users().create(new_user("Ada", true)).unwrap();

    ctx.state
        .users()
        .update(
            &user.id,
            UserPatch {
                role: Some("admin".to_owned()),
                ..UserPatch::default()
            },
        )
        .unwrap();
    other
        .users()
        .update(
            &user.id,
            UserPatch {
                department: Some("Research".to_owned()),
                ..UserPatch::default()
            },
        )
        .unwrap();

    let stored = ctx.state.users().get(&user.id).unwrap();
    assert_eq!(stored.role.as_deref(), Some("admin"));
    assert_eq!(stored.department.as_deref(), Some("Research"));
}

#[test]
fn test_concurrent_creates_in_one_process_are_not_lost() {
    let ctx = TestContext::new().unwrap();
    let threads: Vec<_> = (0..8)
        .map(|i| {
            let state = ctx.state.clone();
            std::thread::spawn(move || {
                state
                    .users()
                    .create(new_user(&format!("User{i}"), i % 2 == 0))
                    .unwrap();
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let stats = ctx.state.users().stats();
    assert_eq!(stats.total, 8);
    assert_eq!(stats.active, 4);
}

#[test]
fn test_two_dashboards_on_one_file_write_concurrently() {
    let ctx = TestContext::new().unwrap();
    let other = ctx.open_another();
    let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));

    let users = {
        let state = ctx.state.clone();
        let barrier = std::sync::Arc::clone(&barrier);
        std::thread::spawn(move || {
            barrier.wait();
            for i in 0..25 {
                state
                    .users()
                    .create(new_user(&format!("User{i}"), true))
                    .unwrap();
            }
        })
    };
    let drafts = std::thread::spawn(move || {
        barrier.wait();
        for i in 0..25 {
            other.editor().save(&format!("<p>draft {i}</p>")).unwrap();
        }
    });
    users.join().unwrap();
    drafts.join().unwrap();

    let reopened = ctx.open_another();
    assert_eq!(reopened.users().list().len(), 25);
    assert_eq!(reopened.editor().load(), "<p>draft 24</p>");
}

#[test]
fn test_malformed_users_key_lists_empty() {
    let ctx = TestContext::new().unwrap();
    ctx.write_raw(keys::USERS, "{\"not\": \"an array\"").unwrap();

    assert!(ctx.state.users().list().is_empty());
    assert_eq!(ctx.state.users().stats().total, 0);

    // The next write replaces the bad value.
    ctx.state.users().create(new_user("Ada", true)).unwrap();
    assert_eq!(ctx.state.users().list().len(), 1);
}

#[test]
fn test_one_bad_record_does_not_wipe_the_collection() {
    let ctx = TestContext::new().unwrap();
    ctx.write_raw(
        keys::USERS,
        r#"[
            {"id": "a1", "name": "Ann", "email": "ann@example.com", "phone": "",
             "address": "", "createdAt": "2024-01-01T00:00:00.000Z",
             "updatedAt": "2024-01-01T00:00:00.000Z", "isActive": true},
            {"id": "b2", "name": "Bob", "email": "bob@example.com", "phone": "",
             "address": "", "createdAt": "2024-01-01T00:00:00.000Z",
             "updatedAt": "2024-01-01T00:00:00.000Z"}
        ]"#,
    )
    .unwrap();

    let names = |state: &userdash_dashboard::AppState| -> Vec<String> {
        state.users().list().into_iter().map(|u| u.name).collect()
    };
    assert_eq!(names(&ctx.state), vec!["Ann"]);

    ctx.state.users().create(new_user("Cy", true)).unwrap();
    assert_eq!(names(&ctx.open_another()), vec!["Ann", "Cy"]);

    let raw = ctx.read_raw(keys::USERS).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
    assert_eq!(value[1]["id"], "b2");
}

#[test]
fn test_reads_records_written_by_older_clients() {
    let ctx = TestContext::new().unwrap();
    ctx.write_raw(
        keys::USERS,
        r#"[{
            "id": "1700000000000",
            "name": "Legacy",
            "email": "legacy@example.com",
            "phone": "5551234567",
            "address": "",
            "role": "",
            "department": "",
            "createdAt": "2023-11-14T22:13:20.000Z",
            "updatedAt": "2023-11-14T22:13:20.000Z",
            "isActive": true
        }]"#,
    )
    .unwrap();

    let users: Vec<User> = ctx.state.users().list();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, UserId::new("1700000000000"));
    assert_eq!(users[0].role, None);
    assert_eq!(users[0].phone.as_ref().unwrap().formatted(), "(555) 123-4567");
}

#[test]
fn test_invalid_input_reports_every_field() {
    let ctx = TestContext::new().unwrap();
    let err = ctx
        .state
        .users()
        .create(NewUser {
            phone: "12".to_owned(),
            ..NewUser::new(" ", "not-an-email")
        })
        .unwrap_err();

    let RepositoryError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.message_for("name"), Some("Name is required"));
    assert_eq!(errors.message_for("email"), Some("Invalid email format"));
    assert_eq!(errors.message_for("phone"), Some("Invalid phone number format"));
    assert!(ctx.state.users().list().is_empty());
}

#[test]
fn test_deleting_user_keeps_their_content() {
    let ctx = TestContext::new().unwrap();
    let user = ctx.state.users().create(new_user("Ada", true)).unwrap();
    ctx.state
        .content()
        .create(user.id.clone(), user.name.clone(), "<p>notes</p>")
        .unwrap();

    ctx.state.users().remove(&user.id).unwrap();
    let entries = ctx.state.content().for_user(&user.id);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_name, "Ada");
}

#[test]
fn test_stored_layout_uses_fixed_keys() {
    let ctx = TestContext::new().unwrap();
    ctx.state.users().create(new_user("Ada", true)).unwrap();
    ctx.state.editor().save("<p>draft</p>").unwrap();

    let raw_users = ctx.read_raw(keys::USERS).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw_users).unwrap();
    assert!(value.is_array());
    assert!(value[0].get("isActive").is_some());

    let raw_editor = ctx.read_raw(keys::EDITOR).unwrap().unwrap();
    assert_eq!(raw_editor, "<p>draft</p>");
}
