use ctx_core::{
    ActiveApp, ConfigWriter, Context, ContextPatch, Error, Field, Provider, WriteMode,
};
use ctx_test_utils::env::TestEnv;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn first_write_creates_pretty_file_with_trailing_newline() {
    let env = TestEnv::new();

    ConfigWriter::new()
        .write(
            &env.global_path(),
            &ContextPatch::new().with_account("a1").with_provider(Provider::Aws),
            WriteMode::Merge,
        )
        .unwrap();

    let content = String::from_utf8(env.read_global().unwrap()).unwrap();
    assert_eq!(content, "{\n  \"account\": \"a1\",\n  \"provider\": \"aws\"\n}\n");
}

#[test]
fn merge_write_keeps_existing_fields() {
    let env = TestEnv::new();
    env.write_global(r#"{"account": "a1", "team": "t1"}"#);

    let committed = ConfigWriter::new()
        .write(
            &env.global_path(),
            &ContextPatch::new().with_team("t2").with_region("eu-west-1"),
            WriteMode::Merge,
        )
        .unwrap();

    assert_eq!(committed.account.as_deref(), Some("a1"));
    env.assert_global_json(json!({"account": "a1", "team": "t2", "region": "eu-west-1"}));
}

#[test]
fn merge_write_null_deletes_key() {
    let env = TestEnv::new();
    env.write_global(r#"{"account": "a1", "team": "t1"}"#);

    ConfigWriter::new()
        .write_json(&env.global_path(), &json!({"team": null}), WriteMode::Merge)
        .unwrap();

    env.assert_global_json(json!({"account": "a1"}));
}

#[test]
fn replace_write_discards_existing_fields() {
    let env = TestEnv::new();
    env.write_local(r#"{"account": "a1", "team": "t1"}"#);

    ConfigWriter::new()
        .write(
            &env.local_path(),
            &ContextPatch::new().with_moniker("m1"),
            WriteMode::Replace,
        )
        .unwrap();

    env.assert_local_json(json!({"moniker": "m1"}));
}

#[test]
fn merge_onto_corrupt_file_replaces_it() {
    let env = TestEnv::new();
    env.write_global("{ not json");

    ConfigWriter::new()
        .write(
            &env.global_path(),
            &ContextPatch::new().with_account("a1"),
            WriteMode::Merge,
        )
        .unwrap();

    env.assert_global_json(json!({"account": "a1"}));
}

#[test]
fn active_app_is_written_as_a_unit() {
    let env = TestEnv::new();
    env.write_global(r#"{"activeApp": {"account": "a1", "team": "t1", "moniker": "m1"}}"#);

    ConfigWriter::new()
        .write(
            &env.global_path(),
            &ContextPatch::new().with_active_app(ActiveApp::new("a2", "t2", "m2")),
            WriteMode::Merge,
        )
        .unwrap();

    env.assert_global_json(json!({"activeApp": {"account": "a2", "team": "t2", "moniker": "m2"}}));
}

#[test]
fn invalid_provider_is_rejected_and_file_untouched() {
    let env = TestEnv::new();
    let original = "{\n  \"account\": \"a1\"\n}\n";
    env.write_global(original);

    let result = ConfigWriter::new().write_json(
        &env.global_path(),
        &json!({"provider": "bogus"}),
        WriteMode::Merge,
    );

    match result {
        Err(Error::Validation(errors)) => assert!(errors.has_path("provider")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(env.read_global().unwrap(), original.as_bytes());
}

#[test]
fn invalid_update_never_creates_file() {
    let env = TestEnv::new();

    let result = ConfigWriter::new().write(
        &env.global_path(),
        &ContextPatch::new().with_account("").with_moniker("Not Valid"),
        WriteMode::Replace,
    );

    match result {
        Err(Error::Validation(errors)) => assert_eq!(errors.violations().len(), 2),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(env.read_global().is_none());
    // Validation happens before any filesystem access
    assert!(!env.global_path().parent().unwrap().exists());
}

#[test]
fn interrupted_commit_leaves_target_byte_identical() {
    let env = TestEnv::new();
    let original = "{\n  \"account\": \"a1\",\n  \"team\": \"t1\"\n}\n";
    env.write_global(original);

    let result = ConfigWriter::new().write_with_hook(
        &env.global_path(),
        &ContextPatch::new().with_team("t2"),
        WriteMode::Merge,
        |_temp| Err(std::io::Error::other("power loss")),
    );

    match result {
        Err(Error::Write { path, .. }) => assert_eq!(path, env.global_path()),
        other => panic!("expected write error, got {:?}", other),
    }
    assert_eq!(env.read_global().unwrap(), original.as_bytes());
    env.assert_no_temp_files();
}

#[test]
fn clear_removes_file_and_tolerates_absence() {
    let env = TestEnv::new();
    env.write_local(r#"{"team": "t1"}"#);
    let writer = ConfigWriter::new();

    assert!(writer.clear(&env.local_path()).unwrap());
    assert!(env.read_local().is_none());
    assert!(!writer.clear(&env.local_path()).unwrap());
}

#[test]
fn clear_field_via_typed_patch() {
    let env = TestEnv::new();
    env.write_global(r#"{"account": "a1", "region": "us-east-1"}"#);

    let committed = ConfigWriter::new()
        .write(
            &env.global_path(),
            &ContextPatch::new().clear(Field::Region),
            WriteMode::Merge,
        )
        .unwrap();

    assert_eq!(
        committed,
        Context {
            account: Some("a1".into()),
            ..Context::default()
        }
    );
}
