//! End-to-end service bootstrap
//!
//! Exercises the complete startup flow: pick a source, layer overrides,
//! register triggers, configure, read typed sections.

use dripconf::{Argv, Config, EnvVar, Filename, SchemaTrigger, coerce};
use dripconf_builtins::{STATSD, register_all};
use dripconf_test_utils::ConfigDir;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
struct SomeService {
    host: String,
    #[serde(deserialize_with = "coerce::int")]
    port: u16,
    #[serde(default = "default_pool_size", deserialize_with = "coerce::int")]
    #[validate(range(min = 1, max = 20))]
    pool_size: u32,
    #[validate(nested)]
    credentials: Credentials,
}

fn default_pool_size() -> u32 {
    5
}

const BASE_INI: &str = "\
[DEFAULT]
owner = payments

[main]
environment = staging

[some_service]
host = db.internal
port = 5432

[statsd]
host = metrics.internal
";

const OVERRIDE_JSON: &str = r#"{
    // secrets are layered in from a separate file
    "some_service": {
        "credentials": {"username": "svc", "password": "hunter2"}
    },
    /* local statsd agent */
    "statsd": {"port": "8129"}
}"#;

fn bootstrap(dir: &ConfigDir, args: &[&str]) -> Config {
    let fallback = dir.path("fallback.ini");

    let mut config = Config::new();
    register_all(&mut config);
    config.register_trigger(SchemaTrigger::<SomeService>::required("some_service"));

    config
        .merge_from(&[
            &Argv::from_args(args.iter().copied(), 1),
            &EnvVar::new("DRIPCONF_BOOTSTRAP_CONF"),
            &Filename::new(fallback),
        ])
        .unwrap();
    config
        .merge(dir.write_json("override", OVERRIDE_JSON))
        .unwrap();
    config.configure().unwrap();
    config
}

#[test]
fn test_full_bootstrap_from_argv() {
    let dir = ConfigDir::new();
    let base = dir.write_ini("base", BASE_INI);
    let base = base.to_str().unwrap();

    let config = temp_env::with_var_unset("DRIPCONF_BOOTSTRAP_CONF", || {
        bootstrap(&dir, &["service", base])
    });

    assert_eq!(config["environment"], "staging");
    assert_eq!(config["owner"], "payments");
    assert_eq!(config["some_service"]["owner"], "payments");

    let service: SomeService = config.section("some_service").unwrap();
    assert_eq!(service.port, 5432);
    assert_eq!(service.pool_size, 5);
    assert_eq!(service.credentials.username, "svc");

    assert_eq!(
        config.get_path("statsd").map(serde_json::Value::from),
        Some(json!({"host": "metrics.internal", "owner": "payments", "port": 8129}))
    );
    assert_eq!(STATSD.get().unwrap().address(), "metrics.internal:8129");
}

#[test]
fn test_bootstrap_falls_back_to_env_var() {
    let dir = ConfigDir::new();
    let base = dir.write_ini("from_env", BASE_INI);

    let config = temp_env::with_var("DRIPCONF_BOOTSTRAP_CONF", Some(&base), || {
        bootstrap(&dir, &["service"])
    });

    assert_eq!(config["some_service"]["host"], "db.internal");
    assert_eq!(config["some_service"]["pool_size"], 5);
}

#[test]
fn test_bootstrap_falls_back_to_default_file() {
    let dir = ConfigDir::new();
    dir.write_ini("fallback", BASE_INI);

    let config = temp_env::with_var_unset("DRIPCONF_BOOTSTRAP_CONF", || {
        bootstrap(&dir, &["service", "--verbose"])
    });

    assert_eq!(config["environment"], "staging");
}

#[test]
fn test_global_container_bootstrap() {
    let dir = ConfigDir::new();
    let yaml = dir.write_yaml("global", "cache:\n  ttl: 60\n  backends: [redis, memory]\n");

    {
        let mut config = dripconf::global();
        config.merge_yaml_file(&yaml).unwrap();
        config.merge(json!({"cache": {"ttl": 120}})).unwrap();
        config.configure().unwrap();
    }

    let config = dripconf::global();
    assert_eq!(config["cache"]["ttl"], 120);
    assert_eq!(config["cache"]["backends"], vec!["redis", "memory"]);
}
