//! Step definitions for the admin user table

use cucumber::{then, when};

use depot_console::models::UserRole;

use crate::features::support::TestWorld;

#[when("I open the user table")]
async fn open_table(world: &mut TestWorld) {
    world.rebuild_source();
    let credential = world.credential();
    let state = world.table.refresh(&world.source, &credential).await.clone();
    world.last_error = state.error().cloned();
}

#[when(expr = "I search users for {string}")]
async fn search_users(world: &mut TestWorld, query: String) {
    world.table.set_search(query);
}

#[when(expr = "I change the role of {string} to {string} leaving the password blank")]
async fn change_role(world: &mut TestWorld, username: String, role: String) {
    let id = world.user_id(&username);
    let credential = world.credential();
    {
        let draft = world.table.open_edit(id).expect("user is listed");
        draft.role = UserRole::from(role);
        draft.password = String::new();
    }
    let result = world.table.submit_edit(&world.source, &credential).await;
    world.record(result);
}

#[when(expr = "I change the email of {string} to {string}")]
async fn change_email(world: &mut TestWorld, username: String, email: String) {
    let id = world.user_id(&username);
    let credential = world.credential();
    world.table.open_edit(id).expect("user is listed").email = email;
    let result = world.table.submit_edit(&world.source, &credential).await;
    world.record(result);
}

#[when(expr = "I ask to delete {string}")]
async fn request_delete(world: &mut TestWorld, username: String) {
    let id = world.user_id(&username);
    world.table.request_delete(id).expect("user is listed");
}

#[when("I cancel the deletion")]
async fn cancel_delete(world: &mut TestWorld) {
    world.table.cancel_delete();
}

#[when("I confirm the deletion")]
async fn confirm_delete(world: &mut TestWorld) {
    let credential = world.credential();
    let result = world.table.confirm_delete(&world.source, &credential).await;
    world.record(result);
}

#[then(expr = "the table should list {string}")]
async fn table_lists(world: &mut TestWorld, names: String) {
    let listed: Vec<&str> = world
        .table
        .filtered()
        .iter()
        .map(|u| u.username.as_str())
        .collect();
    let expected: Vec<&str> = names.split(',').map(str::trim).collect();
    assert_eq!(listed, expected);
}

#[then("the update should not include a password")]
async fn update_without_password(world: &mut TestWorld) {
    let (_, update) = world.source.last_update().expect("no update was sent");
    assert_eq!(update.password, None);
    let body = serde_json::to_value(&update).unwrap();
    assert!(body.get("password").is_none());
}

#[then(expr = "{string} should have role {string}")]
async fn user_has_role(world: &mut TestWorld, username: String, role: String) {
    let user = world
        .table
        .users()
        .iter()
        .find(|u| u.username == username)
        .expect("user is listed");
    assert_eq!(user.role.as_str(), role);
}

#[then("no user should have been deleted")]
async fn nothing_deleted(world: &mut TestWorld) {
    assert!(world.source.deletions.read().unwrap().is_empty());
    assert_eq!(world.table.pending_delete(), None);
}

#[then("the edit form should still be open")]
async fn draft_open(world: &mut TestWorld) {
    assert!(world.table.draft().is_some());
}
