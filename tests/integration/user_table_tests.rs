//! Admin user table tests

use depot_console::models::{NewUser, UserRole};
use depot_console::services::{Credential, LoadState, UserTable};
use depot_console::ConsoleError;

use crate::common::{
    ids, FailOn, MockError, MockRecordSource, UserFactory, UserFixtures, ADMIN_TOKEN,
    CLERK_TOKEN,
};

fn admin() -> Credential {
    Credential::new(ADMIN_TOKEN)
}

fn directory_source() -> MockRecordSource {
    MockRecordSource::new().with_users(UserFixtures::directory())
}

async fn loaded_table(source: &MockRecordSource) -> UserTable {
    let mut table = UserTable::default();
    assert!(table.refresh(source, &admin()).await.is_ready());
    table
}

#[tokio::test]
async fn test_search_matches_role_alone() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    table.set_search("admin");

    let names: Vec<&str> = table.filtered().iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["ayse", "zeynep"]);
}

#[tokio::test]
async fn test_non_admin_token_is_refused() {
    let source = directory_source().with_admin_tokens(&[ADMIN_TOKEN]);
    let mut table = UserTable::default();

    let state = table.refresh(&source, &Credential::new(CLERK_TOKEN)).await;

    assert!(state.error().is_some_and(ConsoleError::is_authorization));
    assert!(table.users().is_empty());

    let err = table
        .create_user(
            &source,
            &Credential::new(CLERK_TOKEN),
            &NewUser {
                username: "newcomer".to_string(),
                email: "newcomer@depot.test".to_string(),
                password: "secret123".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_authorization());

    assert!(table.refresh(&source, &admin()).await.is_ready());
    assert_eq!(table.users().len(), 3);
}

#[tokio::test]
async fn test_pages_of_ten_in_fetch_order() {
    let factory = UserFactory::new();
    let users: Vec<_> = (0..23).map(|_| factory.create().build()).collect();
    let source = MockRecordSource::new().with_users(users.clone());
    let mut table = loaded_table(&source).await;

    assert_eq!(table.page().total_pages, 3);
    table.next_page();
    table.next_page();
    table.next_page();
    let page = table.page();
    assert_eq!(page.number, 3);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].id, users[20].id);
}

#[tokio::test]
async fn test_edit_with_blank_password_omits_it() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    let draft = table.open_edit(ids::CLERK_ID).unwrap();
    draft.role = UserRole::Admin;
    draft.password = "   ".to_string();
    table.submit_edit(&source, &admin()).await.unwrap();

    let (id, update) = source.last_update().unwrap();
    assert_eq!(id, ids::CLERK_ID);
    assert_eq!(update.password, None);
    assert!(serde_json::to_value(&update).unwrap().get("password").is_none());
    assert!(table.draft().is_none());
    // full refetch shows the server's state
    assert_eq!(source.user_fetches(), 2);
    assert!(table.users()[1].is_admin());
}

#[tokio::test]
async fn test_edit_with_new_password_is_trimmed() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    table.open_edit(ids::ADMIN_ID).unwrap().password = "  n3w-secret ".to_string();
    table.submit_edit(&source, &admin()).await.unwrap();

    let (_, update) = source.last_update().unwrap();
    assert_eq!(update.password.as_deref(), Some("n3w-secret"));
}

#[tokio::test]
async fn test_invalid_draft_is_not_sent() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    table.open_edit(ids::ADMIN_ID).unwrap().email = "not-an-email".to_string();
    let err = table.submit_edit(&source, &admin()).await.unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)));
    assert!(source.last_update().is_none());
    assert!(table.draft().is_some());
}

#[tokio::test]
async fn test_failed_edit_keeps_draft_open() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;
    source.set_error_mode(
        FailOn::Mutations,
        MockError::Api(400, "Email already exists".to_string()),
    );

    table.open_edit(ids::CLERK_ID).unwrap().email = "ayse@depot.test".to_string();
    let err = table.submit_edit(&source, &admin()).await.unwrap_err();

    assert_eq!(err.user_message(), "Email already exists");
    assert_eq!(table.draft().unwrap().email, "ayse@depot.test");
    assert_eq!(source.user_fetches(), 1);
}

#[tokio::test]
async fn test_submit_without_draft() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    let err = table.submit_edit(&source, &admin()).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
}

#[tokio::test]
async fn test_confirmed_delete_refetches() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    table.request_delete(ids::AUDITOR_ID).unwrap();
    table.confirm_delete(&source, &admin()).await.unwrap();

    assert_eq!(table.pending_delete(), None);
    assert_eq!(table.users().len(), 2);
    assert_eq!(*source.deletions.read().unwrap(), vec![ids::AUDITOR_ID]);
}

#[tokio::test]
async fn test_failed_delete_clears_selection_without_refetch() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;
    source.set_error_mode(FailOn::Mutations, MockError::ConnectionRefused);

    table.request_delete(ids::AUDITOR_ID).unwrap();
    let err = table.confirm_delete(&source, &admin()).await.unwrap_err();

    assert!(matches!(err, ConsoleError::Transport(_)));
    assert_eq!(table.pending_delete(), None);
    assert_eq!(table.users().len(), 3);
    assert_eq!(source.user_fetches(), 1);
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    table.request_delete(ids::CLERK_ID).unwrap();
    table.cancel_delete();
    let err = table.confirm_delete(&source, &admin()).await.unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)));
    assert!(source.deletions.read().unwrap().is_empty());
}

#[tokio::test]
async fn test_refetch_failure_after_mutation() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;
    source.set_error_mode(FailOn::RefetchAfterMutation, MockError::ConnectionRefused);

    table.request_delete(ids::CLERK_ID).unwrap();
    let result = table.confirm_delete(&source, &admin()).await;

    assert!(result.is_ok());
    assert!(matches!(
        table.state(),
        LoadState::Failed(ConsoleError::Transport(_))
    ));
}

#[tokio::test]
async fn test_create_user_then_refetch() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    let created = table
        .create_user(
            &source,
            &admin(),
            &NewUser {
                username: "elif".to_string(),
                email: "elif@depot.test".to_string(),
                password: "secret1".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(created.id, 4);
    assert_eq!(table.users().len(), 4);
}

#[tokio::test]
async fn test_create_duplicate_username() {
    let source = directory_source();
    let mut table = loaded_table(&source).await;

    let err = table
        .create_user(
            &source,
            &admin(),
            &NewUser {
                username: "ayse".to_string(),
                email: "other@depot.test".to_string(),
                password: "secret1".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Username already exists");
    assert_eq!(table.users().len(), 3);
}

#[tokio::test]
async fn test_forbidden_directory() {
    let source = directory_source();
    let mut table = UserTable::default();

    let state = table.refresh(&source, &Credential::new("")).await;

    assert!(state.error().is_some_and(ConsoleError::is_authorization));
}
