//! Step definitions for the activity log viewer

use chrono::NaiveDate;
use cucumber::{given, then, when};

use depot_console::models::ActionKind;
use depot_console::services::LoadState;

use crate::common::LogFixtures;
use crate::features::support::TestWorld;

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("scenario dates are YYYY-MM-DD")
}

#[given(expr = "the activity log has {int} entries")]
async fn log_has_entries(world: &mut TestWorld, count: i64) {
    world.logs = LogFixtures::sequence(count);
}

#[when("I open the activity log")]
async fn open_log(world: &mut TestWorld) {
    world.rebuild_source();
    let credential = world.credential();
    let state = world.viewer.load(&world.source, &credential).await.clone();
    world.last_error = state.error().cloned();
}

#[when(expr = "I go to page {int}")]
async fn go_to_page(world: &mut TestWorld, page: usize) {
    world.viewer.go_to_page(page);
}

#[when(expr = "I filter by action {string}")]
async fn filter_by_action(world: &mut TestWorld, action: String) {
    world.viewer.set_action(Some(ActionKind::from(action)));
}

#[when(expr = "I search the log for {string}")]
async fn search_log(world: &mut TestWorld, query: String) {
    world.viewer.set_query(query);
}

#[when(expr = "I limit the log to {string} through {string}")]
async fn limit_dates(world: &mut TestWorld, from: String, to: String) {
    world.viewer.set_start(Some(date(&from)));
    world.viewer.set_end(Some(date(&to)));
}

#[when("I clear the filters")]
async fn clear_filters(world: &mut TestWorld) {
    world.viewer.reset_filters();
}

#[when(expr = "I export the log on {string}")]
async fn export_log(world: &mut TestWorld, on: String) {
    world.export = Some(world.viewer.export_csv_on(date(&on)));
}

#[then(expr = "there should be {int} page(s)")]
async fn page_count(world: &mut TestWorld, pages: usize) {
    assert_eq!(world.viewer.total_pages(), pages);
}

#[then(expr = "the current page should be {int}")]
async fn current_page(world: &mut TestWorld, page: usize) {
    assert_eq!(world.viewer.current_page(), page);
}

#[then(expr = "the page should show {int} entries")]
async fn page_shows(world: &mut TestWorld, count: usize) {
    assert_eq!(world.viewer.page().items.len(), count);
}

#[then(expr = "{int} entries should match")]
async fn entries_match(world: &mut TestWorld, count: usize) {
    assert_eq!(world.viewer.filtered().len(), count);
}

#[then("the entries should be newest first")]
async fn newest_first(world: &mut TestWorld) {
    let filtered = world.viewer.filtered();
    assert!(filtered
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp));
}

#[then("the log should not be shown")]
async fn log_not_shown(world: &mut TestWorld) {
    assert!(matches!(world.viewer.state(), LoadState::Failed(_)));
}

#[then(expr = "the export file should be named {string}")]
async fn export_named(world: &mut TestWorld, name: String) {
    let export = world.export.as_ref().expect("no export was made");
    assert_eq!(export.file_name, name);
}

#[then(expr = "the export should contain {int} rows")]
async fn export_rows(world: &mut TestWorld, rows: usize) {
    let export = world.export.as_ref().expect("no export was made");
    assert_eq!(export.rows, rows);
    assert_eq!(export.contents.split('\n').count(), rows + 1);
}

#[then(expr = "the first exported row should name {string}")]
async fn first_row_actor(world: &mut TestWorld, username: String) {
    let export = world.export.as_ref().expect("no export was made");
    let row = export.contents.split('\n').nth(1).expect("export has no rows");
    assert!(
        row.contains(&format!("\"{}\"", username)),
        "row {} does not name {}",
        row,
        username
    );
}
