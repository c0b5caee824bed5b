use assert_fs::prelude::*;
use ctx_fs::locate::find_upward_with;
use ctx_fs::{CtxPath, find_local_config, find_upward};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::{Path, PathBuf};

#[test]
fn finds_config_in_start_directory() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".ctx/config.json").touch().unwrap();

    let found = find_local_config(temp.path());

    temp.child(".ctx/config.json")
        .assert(predicate::path::is_file());
    assert_eq!(found, Some(temp.path().join(CtxPath::relative_config())));
}

#[rstest]
#[case("a")]
#[case("a/b")]
#[case("a/b/c/d")]
fn finds_config_in_ancestor(#[case] nested: &str) {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".ctx/config.json").touch().unwrap();
    let start = temp.child(nested);
    start.create_dir_all().unwrap();

    let found = find_local_config(start.path());

    assert_eq!(found, Some(temp.path().join(".ctx").join("config.json")));
}

#[test]
fn nearest_config_wins() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".ctx/config.json").touch().unwrap();
    temp.child("project/.ctx/config.json").touch().unwrap();
    let start = temp.child("project/src");
    start.create_dir_all().unwrap();

    let found = find_local_config(start.path());

    assert_eq!(
        found,
        Some(temp.path().join("project").join(".ctx").join("config.json"))
    );
}

#[test]
fn directory_named_like_config_is_ignored() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("inner/.ctx/config.json").create_dir_all().unwrap();
    temp.child(".ctx/config.json").touch().unwrap();

    let found = find_local_config(temp.child("inner").path());

    assert_eq!(found, Some(temp.path().join(".ctx").join("config.json")));
}

#[test]
fn returns_none_when_nothing_matches() {
    let temp = assert_fs::TempDir::new().unwrap();
    let start = temp.child("x/y");
    start.create_dir_all().unwrap();

    let found = find_upward(start.path(), "definitely-not-a-real-marker-7f3a.json");

    assert_eq!(found, None);
}

#[test]
fn relative_start_is_walked_from_the_current_directory() {
    let cwd = std::env::current_dir().unwrap();
    let mut visited: Vec<PathBuf> = Vec::new();

    let found = find_upward_with(Path::new("nested/dir"), ".ctx/config.json", |candidate| {
        visited.push(candidate.to_path_buf());
        false
    });

    assert_eq!(found, None);
    assert!(visited.iter().all(|p| p.is_absolute()), "{:?}", visited);
    assert_eq!(
        visited.first(),
        Some(&cwd.join("nested").join("dir").join(".ctx/config.json"))
    );
    let root = cwd.ancestors().last().unwrap();
    assert_eq!(visited.last(), Some(&root.join(".ctx/config.json")));
}

#[test]
fn relative_start_finds_marker_in_a_real_parent() {
    // Tests run with the package directory as the working directory
    let package_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let found = find_upward_with(Path::new("src"), "ctx-fs", |candidate| candidate.is_dir());

    assert_eq!(found, Some(package_dir.to_path_buf()));
}
