use ctx_core::{
    ActiveApp, ConfigPaths, ConfigSource, Context, ContextPatch, ContextResolver, Field, Origin,
    Overrides, Provider,
};
use ctx_test_utils::env::TestEnv;
use pretty_assertions::assert_eq;

fn resolver(env: &TestEnv, cwd: std::path::PathBuf) -> ContextResolver {
    ContextResolver::new(ConfigPaths::new(env.global_path()), cwd)
}

#[test]
fn nothing_configured_resolves_empty() {
    let env = TestEnv::new();

    let context = resolver(&env, env.project_root()).resolve(&ContextPatch::new());

    assert_eq!(context, Context::default());
}

#[test]
fn local_overrides_global() {
    let env = TestEnv::new();
    env.write_global(r#"{"account": "a1", "team": "t1"}"#);
    env.write_local(r#"{"team": "t2", "moniker": "m1"}"#);

    let context = resolver(&env, env.project_root()).resolve(&ContextPatch::new());

    assert_eq!(
        context,
        Context {
            account: Some("a1".into()),
            team: Some("t2".into()),
            moniker: Some("m1".into()),
            ..Context::default()
        }
    );
}

#[test]
fn local_config_is_found_from_nested_directory() {
    let env = TestEnv::new();
    env.write_local(r#"{"region": "eu-central-1"}"#);
    let cwd = env.project_subdir("services/api/src");

    let resolver = resolver(&env, cwd);

    assert_eq!(resolver.local_path(), Some(env.local_path()));
    assert_eq!(
        resolver.resolve(&ContextPatch::new()).region.as_deref(),
        Some("eu-central-1")
    );
}

#[test]
fn active_app_backfills_unset_fields() {
    let env = TestEnv::new();
    env.write_global(r#"{"activeApp": {"account": "a1", "team": "t1", "moniker": "m1"}}"#);

    let context = resolver(&env, env.project_root()).resolve(&ContextPatch::new());

    assert_eq!(
        context,
        Context {
            account: Some("a1".into()),
            team: Some("t1".into()),
            moniker: Some("m1".into()),
            active_app: Some(ActiveApp::new("a1", "t1", "m1")),
            ..Context::default()
        }
    );
}

#[test]
fn explicit_override_beats_global() {
    let env = TestEnv::new();
    env.write_global(r#"{"account": "g1", "team": "g-team"}"#);
    env.write_local("{}");

    let context =
        resolver(&env, env.project_root()).resolve(&ContextPatch::new().with_account("cli1"));

    assert_eq!(
        context,
        Context {
            account: Some("cli1".into()),
            team: Some("g-team".into()),
            ..Context::default()
        }
    );
}

#[test]
fn explicit_values_win_over_active_app() {
    let env = TestEnv::new();
    env.write_global(r#"{"activeApp": {"account": "a1", "team": "t1", "moniker": "m1"}}"#);

    let context =
        resolver(&env, env.project_root()).resolve(&ContextPatch::new().with_moniker("other"));

    assert_eq!(context.moniker.as_deref(), Some("other"));
    assert_eq!(context.account.as_deref(), Some("a1"));
}

#[test]
fn override_null_removes_lower_layer_value() {
    let env = TestEnv::new();
    env.write_global(r#"{"account": "a1", "region": "us-east-1"}"#);

    let context =
        resolver(&env, env.project_root()).resolve(&ContextPatch::new().clear(Field::Region));

    assert_eq!(context.region, None);
    assert_eq!(context.account.as_deref(), Some("a1"));
}

#[test]
fn corrupt_files_degrade_to_empty_layers() {
    let env = TestEnv::new();
    env.write_global("{{{");
    env.write_local(r#"{"provider": "gcp", "team": "t1"}"#);

    let context =
        resolver(&env, env.project_root()).resolve(&ContextPatch::new().with_region("r1"));

    assert_eq!(
        context,
        Context {
            region: Some("r1".into()),
            ..Context::default()
        }
    );
}

#[test]
fn traced_resolution_reports_origins() {
    let env = TestEnv::new();
    env.write_global(r#"{"account": "a1", "provider": "aws", "activeApp": {"account": "x", "team": "t1", "moniker": "m1"}}"#);
    env.write_local(r#"{"region": "eu-west-1"}"#);

    let overrides = Overrides::new()
        .with_layer(
            ConfigSource::CommandLine,
            ContextPatch::new().with_provider(Provider::Mock),
        )
        .with_layer(
            ConfigSource::Environment,
            ContextPatch::new().with_provider(Provider::Azure).with_region("us-west-2"),
        );

    let resolution = resolver(&env, env.project_root()).resolve_traced(&overrides);

    assert_eq!(resolution.context.provider, Some(Provider::Mock));
    assert_eq!(resolution.context.region.as_deref(), Some("us-west-2"));
    assert_eq!(resolution.context.account.as_deref(), Some("a1"));

    let origin = |field: Field| resolution.origins.get(&field).copied();
    assert_eq!(origin(Field::Account), Some(Origin::Source(ConfigSource::Global)));
    assert_eq!(origin(Field::Provider), Some(Origin::Source(ConfigSource::CommandLine)));
    assert_eq!(origin(Field::Region), Some(Origin::Source(ConfigSource::Environment)));
    assert_eq!(origin(Field::Team), Some(Origin::ActiveApp));
    assert_eq!(origin(Field::Moniker), Some(Origin::ActiveApp));
}

#[test]
fn resolved_context_feeds_deploy_target() {
    let env = TestEnv::new();
    env.write_global(r#"{"provider": "aws", "region": "us-east-1"}"#);
    env.write_local(r#"{"activeApp": {"account": "a1", "team": "t1", "moniker": "m1"}}"#);

    let target = resolver(&env, env.project_root())
        .resolve(&ContextPatch::new())
        .require_target()
        .unwrap();

    assert_eq!(target.account, "a1");
    assert_eq!(target.moniker, "m1");
    assert_eq!(target.provider, Provider::Aws);
}
