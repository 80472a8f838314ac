//! End-to-end coverage of the event loop state machine: key transitions
//! issue tasks, task completions merge back, and the list is only ever
//! updated from a re-queried snapshot.

mod common;

use std::time::{Duration, Instant};

use common::{TestRepo, git_stdout, setup_repo, setup_repo_with_commit, write_file};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gst::app::App;
use gst::git::{Deadlines, GitClient, StatusCode};
use gst::keys::KeyMap;
use gst::worker::GitTasks;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn start(repo: &TestRepo) -> (App, GitTasks) {
    let client = GitClient::new(repo.path.clone(), Deadlines::default());
    let tasks = GitTasks::new(client);
    let app = App::new(KeyMap::default());
    tasks.spawn_status();
    (app, tasks)
}

fn press(app: &mut App, tasks: &GitTasks, event: KeyEvent) {
    if let Some(command) = app.handle_key(event) {
        tasks.dispatch(command);
    }
}

/// Run the merge loop until the predicate holds, dispatching any follow-up
/// commands the merges produce, exactly as the real loop does.
async fn drive(app: &mut App, tasks: &mut GitTasks, pred: impl Fn(&App) -> bool) {
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(10) {
        while let Some(event) = tasks.try_next_event() {
            if let Some(command) = app.apply_event(event) {
                tasks.dispatch(command);
            }
        }
        if pred(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached within 10s");
}

#[tokio::test]
async fn test_initial_load_populates_snapshot() {
    let repo = setup_repo();
    write_file(&repo.path, "a.txt", "hello\n");

    let (mut app, mut tasks) = start(&repo);
    drive(&mut app, &mut tasks, |app| !app.entries().is_empty()).await;

    assert_eq!(app.entries().len(), 1);
    assert_eq!(app.entries()[0].path, "a.txt");
    assert!(!app.is_loading());
}

#[tokio::test]
async fn test_stage_key_requeries_rather_than_patching() {
    let repo = setup_repo();
    write_file(&repo.path, "a.txt", "hello\n");

    let (mut app, mut tasks) = start(&repo);
    drive(&mut app, &mut tasks, |app| !app.entries().is_empty()).await;
    assert_eq!(app.entries()[0].code, StatusCode::Untracked);

    press(&mut app, &tasks, key(KeyCode::Char(' ')));
    // The snapshot must still show the pre-stage state until the refresh
    // triggered by the stage completion arrives.
    assert_eq!(app.entries()[0].code, StatusCode::Untracked);

    drive(&mut app, &mut tasks, |app| {
        app.entries()
            .first()
            .is_some_and(|e| e.code == StatusCode::Added)
    })
    .await;
}

#[tokio::test]
async fn test_commit_flow_clears_list_and_records_message() {
    let repo = setup_repo_with_commit();
    write_file(&repo.path, "a.txt", "hello\n");

    let (mut app, mut tasks) = start(&repo);
    drive(&mut app, &mut tasks, |app| !app.entries().is_empty()).await;

    press(&mut app, &tasks, key(KeyCode::Char(' ')));
    drive(&mut app, &mut tasks, |app| {
        app.entries()
            .first()
            .is_some_and(|e| e.code == StatusCode::Added)
    })
    .await;

    press(&mut app, &tasks, key(KeyCode::Char('c')));
    assert!(app.is_editing_commit());
    for c in "fix bug".chars() {
        press(&mut app, &tasks, key(KeyCode::Char(c)));
    }
    press(&mut app, &tasks, key(KeyCode::Enter));
    assert!(!app.is_editing_commit());

    drive(&mut app, &mut tasks, |app| {
        app.entries().is_empty() && !app.is_loading()
    })
    .await;

    let subject = git_stdout(&repo.path, &["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim_end(), "fix bug");
}

#[tokio::test]
async fn test_toggle_diff_fetches_selected_file() {
    let repo = setup_repo_with_commit();
    write_file(&repo.path, "initial.txt", "new content\n");

    let (mut app, mut tasks) = start(&repo);
    drive(&mut app, &mut tasks, |app| !app.entries().is_empty()).await;

    press(&mut app, &tasks, key(KeyCode::Tab));
    assert!(app.diff_visible());

    drive(&mut app, &mut tasks, |app| app.diff_text().is_some()).await;
    let diff = app.diff_text().unwrap();
    assert!(diff.contains("+new content"));
}

#[tokio::test]
async fn test_failed_commit_surfaces_error_and_loop_stays_live() {
    let repo = setup_repo_with_commit();

    let (mut app, mut tasks) = start(&repo);
    drive(&mut app, &mut tasks, |app| !app.is_loading()).await;

    // Nothing staged, so the commit task must fail.
    press(&mut app, &tasks, key(KeyCode::Char('c')));
    for c in "doomed".chars() {
        press(&mut app, &tasks, key(KeyCode::Char(c)));
    }
    press(&mut app, &tasks, key(KeyCode::Enter));

    drive(&mut app, &mut tasks, |app| app.last_error().is_some()).await;
    assert!(app.last_error().unwrap().starts_with("commit:"));

    // Further input still works: a refresh completes normally.
    press(&mut app, &tasks, key(KeyCode::Char('r')));
    drive(&mut app, &mut tasks, |app| !app.is_loading()).await;
}
