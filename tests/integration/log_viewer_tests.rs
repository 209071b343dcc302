//! Activity log viewer tests

use chrono::NaiveDate;
use rstest::rstest;

use depot_console::models::ActionKind;
use depot_console::services::{Credential, LoadState, LogViewer};
use depot_console::ConsoleError;

use crate::common::{
    ids, FailOn, LogFactory, LogFixtures, MockError, MockRecordSource, UserFixtures, ADMIN_TOKEN,
};

fn admin() -> Credential {
    Credential::new(ADMIN_TOKEN)
}

async fn loaded_viewer(source: &MockRecordSource) -> LogViewer {
    let mut viewer = LogViewer::new(12);
    let state = viewer.load(source, &admin()).await;
    assert_eq!(state, &LoadState::Ready);
    viewer
}

#[tokio::test]
async fn test_twenty_five_entries_make_three_pages() {
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(25))
        .with_users(UserFixtures::directory());
    let mut viewer = loaded_viewer(&source).await;

    assert_eq!(viewer.total_pages(), 3);
    viewer.go_to_page(3);
    let page = viewer.page();
    assert_eq!(page.items.len(), 1);
    // newest first: the last page holds the oldest entry
    assert_eq!(page.items[0].id, 1);
}

#[tokio::test]
async fn test_filter_resets_to_single_page() {
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(25))
        .with_users(UserFixtures::directory());
    let mut viewer = loaded_viewer(&source).await;
    viewer.go_to_page(3);

    viewer.set_action(Some(ActionKind::DeleteProduct));

    assert_eq!(viewer.filtered().len(), 5);
    assert_eq!(viewer.total_pages(), 1);
    assert_eq!(viewer.current_page(), 1);
}

#[rstest]
#[case("silme", 5)]
#[case("SILME", 5)]
#[case("mehmet", 5)]
#[case("ayse", 20)]
#[case("105", 1)]
#[case("nothing-matches", 0)]
#[tokio::test]
async fn test_free_text_search(#[case] query: &str, #[case] expected: usize) {
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(25))
        .with_users(UserFixtures::directory());
    let mut viewer = loaded_viewer(&source).await;

    viewer.set_query(query);

    assert_eq!(viewer.filtered().len(), expected);
}

#[tokio::test]
async fn test_unknown_actor_falls_back_to_id_label() {
    let mut logs = LogFixtures::sequence(2);
    logs[0].user_id = ids::GHOST_ID;
    let source = MockRecordSource::new()
        .with_logs(logs)
        .with_users(UserFixtures::directory());
    let mut viewer = loaded_viewer(&source).await;

    viewer.set_query("user#99");

    let filtered = viewer.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(viewer.display_name(filtered[0].user_id), "user#99");
}

#[tokio::test]
async fn test_date_range_is_inclusive() {
    // entries fall on 2024-05-01 10:00 through 2024-05-02 10:00, one per hour
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(25))
        .with_users(UserFixtures::directory());
    let mut viewer = loaded_viewer(&source).await;

    viewer.set_start(NaiveDate::from_ymd_opt(2024, 5, 2));
    assert_eq!(viewer.filtered().len(), 11);

    viewer.set_start(None);
    viewer.set_end(NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(viewer.filtered().len(), 14);
}

#[tokio::test]
async fn test_failed_logs_fetch_fails_the_view() {
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(3))
        .with_users(UserFixtures::directory());
    source.set_error_mode(FailOn::Logs, MockError::Api(500, "boom".to_string()));

    let mut viewer = LogViewer::default();
    let state = viewer.load(&source, &admin()).await.clone();

    assert_eq!(
        state,
        LoadState::Failed(ConsoleError::Api {
            status: 500,
            message: "boom".to_string()
        })
    );
    assert!(viewer.filtered().is_empty());
}

#[tokio::test]
async fn test_failed_directory_fetch_fails_the_view() {
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(3))
        .with_users(UserFixtures::directory());
    source.set_error_mode(FailOn::Users, MockError::Forbidden);

    let mut viewer = LogViewer::default();
    let state = viewer.load(&source, &admin()).await;

    assert!(state.error().is_some_and(ConsoleError::is_authorization));
}

#[tokio::test]
async fn test_reload_replaces_collection() {
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(25))
        .with_users(UserFixtures::directory());
    let mut viewer = loaded_viewer(&source).await;
    assert_eq!(viewer.total_entries(), 25);

    let source = source.with_logs(LogFixtures::sequence(4));
    viewer.load(&source, &admin()).await;

    assert_eq!(viewer.total_entries(), 4);
}

#[tokio::test]
async fn test_random_logs_filter_properties() {
    let users = UserFixtures::directory();
    let logs = LogFactory::random(200, &[ids::ADMIN_ID, ids::CLERK_ID, ids::GHOST_ID]);
    let source = MockRecordSource::new()
        .with_logs(logs.clone())
        .with_users(users);
    let mut viewer = loaded_viewer(&source).await;

    viewer.set_action(Some(ActionKind::IncreaseStock));
    viewer.set_start(NaiveDate::from_ymd_opt(2024, 5, 10));
    viewer.set_end(NaiveDate::from_ymd_opt(2024, 5, 20));

    let filtered = viewer.filtered();
    assert!(filtered.iter().all(|e| e.action == ActionKind::IncreaseStock));
    assert!(filtered
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp));
    assert!(filtered.iter().all(|e| logs.contains(e)));

    // pages concatenate back to the filtered collection
    let mut paged = Vec::new();
    for number in 1..=viewer.total_pages() {
        viewer.go_to_page(number);
        paged.extend(viewer.page().items.into_iter().map(|e| e.id));
    }
    let ids: Vec<i64> = viewer.filtered().iter().map(|e| e.id).collect();
    assert_eq!(paged, ids);
}

#[tokio::test]
async fn test_export_covers_filtered_collection() {
    let source = MockRecordSource::new()
        .with_logs(LogFixtures::sequence(25))
        .with_users(UserFixtures::directory());
    let mut viewer = loaded_viewer(&source).await;
    viewer.set_query("silme");
    viewer.go_to_page(2);

    let export = viewer.export_csv_on(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    let lines: Vec<&str> = export.contents.split('\n').collect();

    assert_eq!(export.file_name, "logs_2024-05-03.csv");
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[1],
        r#""2024-05-01T14:00:00.000Z","mehmet","Ürün Silme","product","105""#
    );
}
