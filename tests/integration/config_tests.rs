use super::ENV_MUTEX;
use clap::Parser;
use figment::providers::Serialized;
use namedupe::cli::{Cli, Commands, OutputFormat};
use namedupe::config::{Config, ConfigError};
use namedupe::duplicates::SearchMode;
use std::fs;
use tempfile::tempdir;

fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("NAMEDUPE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config.max_depth, 10);
    assert_eq!(config.search_mode, SearchMode::Perfect);
    assert_eq!(config.output, OutputFormat::Text);
}

#[test]
fn test_config_load_from_toml() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
max_depth = 4
search_mode = "full"
skip_hidden = true
ignore_patterns = ["target", "  ", "*.tmp"]
output = "json"
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.max_depth, 4);
    assert_eq!(config.search_mode, SearchMode::Full);
    assert!(config.skip_hidden);
    assert_eq!(config.ignore_patterns, vec!["target", "*.tmp"]);
    assert_eq!(config.output, OutputFormat::Json);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "skip_hidden = true\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert!(config.skip_hidden);
    assert_eq!(config.max_depth, 10);
    assert_eq!(config.search_mode, SearchMode::Perfect);
}

#[test]
fn test_env_overrides_toml() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "max_depth = 4\nsearch_mode = \"full\"\n").unwrap();

    std::env::set_var("NAMEDUPE_MAX_DEPTH", "7");
    std::env::set_var("NAMEDUPE_OUTPUT", "csv");

    let result = Config::load_from_path(&config_path);
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.max_depth, 7);
    assert_eq!(config.search_mode, SearchMode::Full);
    assert_eq!(config.output, OutputFormat::Csv);
}

#[test]
fn test_invalid_toml_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "search_mode = \"fuzzy\"\n").unwrap();

    let result = Config::load_from_path(&config_path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    match Config::load(Some(missing.as_path())) {
        Err(ConfigError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_cli_overrides_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "max_depth = 4\nsearch_mode = \"full\"\nignore_patterns = [\"target\"]\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "namedupe",
        "find",
        "/tmp",
        "--mode",
        "perfect",
        "--max-depth",
        "2",
        "--ignore",
        "*.bak",
        "--output",
        "csv",
    ])
    .unwrap();

    let mut config = Config::load_from_path(&config_path).unwrap();
    match cli.command {
        Commands::Find(args) => {
            config.merge_walk_args(&args.walk);
            config.merge_mode(args.mode);
        }
        other => panic!("Expected find, got {:?}", other),
    }

    assert_eq!(config.max_depth, 2);
    assert_eq!(config.search_mode, SearchMode::Perfect);
    assert_eq!(config.ignore_patterns, vec!["target", "*.bak"]);
    assert_eq!(config.output, OutputFormat::Csv);

    let walker = config.walker_config();
    assert_eq!(walker.max_depth, 2);
    assert_eq!(walker.ignore_patterns, vec!["target", "*.bak"]);
}

#[test]
fn test_rendered_config_loads_back() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let config = Config {
        max_depth: 3,
        search_mode: SearchMode::Full,
        skip_hidden: true,
        ignore_patterns: vec!["node_modules".to_string()],
        output: OutputFormat::Json,
    };

    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, config.to_toml().unwrap()).unwrap();

    assert_eq!(Config::load_from_path(&config_path).unwrap(), config);
}
