// Integration test for restoring the dashboard shell across sessions.
use std::fs;

use panelsync::{PreferenceStore, ShellState};
use panelsync_client::{DASHBOARD_SECTIONS, DEFAULT_SECTION};
use tempfile::tempdir;
use test_case::test_case;

#[test]
fn shell_state_survives_a_restart() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.json");

    {
        let mut store = PreferenceStore::load(Some(&path)).expect("load");
        let mut shell = ShellState::restore(&store, DASHBOARD_SECTIONS, DEFAULT_SECTION);
        assert_eq!(shell.active_section(), DEFAULT_SECTION);
        assert!(!shell.sidebar_collapsed());

        shell
            .activate(&mut store, "finance-section")
            .expect("activate");
        shell.toggle_sidebar(&mut store).expect("collapse");
    }

    let store = PreferenceStore::load(Some(&path)).expect("reload");
    let shell = ShellState::restore(&store, DASHBOARD_SECTIONS, DEFAULT_SECTION);
    assert_eq!(shell.active_section(), "finance-section");
    assert!(shell.sidebar_collapsed());
}

#[test_case(r#"{"values":{"sidebarCollapsed":"false"}}"#, false ; "explicit false")]
#[test_case(r#"{"values":{"sidebarCollapsed":"yes"}}"#, false ; "non boolean")]
#[test_case(r#"{"values":{}}"#, false ; "absent key")]
#[test_case(r#"{"values":{"sidebarCollapsed":"true","activeSection":"gone"}}"#, true ; "stale section")]
fn restores_from_hand_written_files(contents: &str, collapsed: bool) {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.json");
    fs::write(&path, contents).expect("write");

    let store = PreferenceStore::load(Some(&path)).expect("load");
    let shell = ShellState::restore(&store, DASHBOARD_SECTIONS, DEFAULT_SECTION);
    assert_eq!(shell.sidebar_collapsed(), collapsed);
    assert_eq!(shell.active_section(), DEFAULT_SECTION);
}
