use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn semcompare(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_semcompare"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run semcompare")
}

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let output = semcompare(temp_path, &["init"]);
    assert!(output.status.success());

    // Check that config file and sample corpus were created
    let config_path = temp_path.join(".semcompare/settings.toml");
    assert!(config_path.exists());
    assert!(temp_path.join("documents.json").exists());

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[semantic]"));
    assert!(content.contains("collection = \"blog_posts\""));
    assert!(content.contains("verify_collection = \"test_blog_posts\""));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    assert!(semcompare(temp_path, &["init"]).status.success());

    let output = semcompare(temp_path, &["init"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--force"));

    assert!(semcompare(temp_path, &["init", "--force"]).status.success());
}

#[test]
fn test_config_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    // Create a custom config
    let config_dir = temp_path.join(".semcompare");
    std::fs::create_dir_all(&config_dir).unwrap();

    let config_content = r#"
version = 2
[search]
limit = 7
"#;
    std::fs::write(config_dir.join("settings.toml"), config_content).unwrap();

    let output = semcompare(temp_path, &["config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("version = 2"));
    assert!(stdout.contains("limit = 7"));
    // Untouched sections keep their defaults
    assert!(stdout.contains("collection = \"blog_posts\""));
}

#[test]
fn test_config_env_override() {
    let temp_dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_semcompare"))
        .current_dir(temp_dir.path())
        .arg("config")
        .env("SEMCOMPARE_SERVER__BIND", "0.0.0.0:9999")
        .env("SEMCOMPARE_SEARCH__PREVIEW_CHARS", "42")
        .output()
        .expect("Failed to run config command");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bind = \"0.0.0.0:9999\""));
    assert!(stdout.contains("preview_chars = 42"));
}

#[test]
fn test_explicit_config_path() {
    let temp_dir = TempDir::new().unwrap();
    let custom = temp_dir.path().join("custom.toml");
    std::fs::write(&custom, "[server]\nbind = \"127.0.0.1:1234\"\n").unwrap();

    let output = semcompare(
        temp_dir.path(),
        &["--config", custom.to_str().unwrap(), "config"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("127.0.0.1:1234"));
}

#[test]
fn test_keyword_only_search() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    assert!(semcompare(temp_path, &["init"]).status.success());

    let output = semcompare(temp_path, &["search", "bread", "--only", "keyword"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Keyword Search Results"));
    assert!(stdout.contains("### Result 1 (Matches: 1)"));
    assert!(stdout.contains("Baking bread"));
    assert!(!stdout.contains("Semantic Search Results"));
}

#[test]
fn test_keyword_only_search_json() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    assert!(semcompare(temp_path, &["init"]).status.success());

    let output = semcompare(
        temp_path,
        &["search", "bread", "--only", "keyword", "--json"],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["meta"]["count"], 1);
    assert_eq!(json["meta"]["query"], "bread");
    assert!(json["data"].get("semantic").is_none());

    let results = json["data"]["keyword"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["rank"], 1);
    assert_eq!(results[0]["index"], 1);
    assert_eq!(results[0]["score"]["kind"], "matches");
    assert_eq!(results[0]["score"]["value"], 1);
}

#[test]
fn test_stop_word_query_exits_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    assert!(semcompare(temp_path, &["init"]).status.success());

    let output = semcompare(temp_path, &["search", "the is a", "--only", "keyword"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Query contains only stop words."));
}

#[test]
fn test_invalid_corpus_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    assert!(semcompare(temp_path, &["init"]).status.success());

    std::fs::write(temp_path.join("documents.json"), r#"["fine", 42]"#).unwrap();

    let output = semcompare(temp_path, &["search", "fine", "--only", "keyword"]);
    assert_eq!(output.status.code(), Some(4));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid document at index 1"));
}

#[test]
fn test_missing_corpus_json_error() {
    let temp_dir = TempDir::new().unwrap();

    let output = semcompare(
        temp_dir.path(),
        &["search", "bread", "--only", "keyword", "--json"],
    );
    assert_eq!(output.status.code(), Some(4));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "CORPUS_ERROR");
    assert_eq!(json["exit_code"], 4);
}
