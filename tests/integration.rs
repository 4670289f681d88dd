mod common;

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

use common::setup_test_env;

fn lectio_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("lectio");
    path
}

fn run_lectio(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = lectio_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run lectio binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn run_json(config_path: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, success) = run_lectio(config_path, args);
    assert!(success, "command failed: stdout={}, stderr={}", stdout, stderr);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON ({}): {}", e, stdout))
}

#[tokio::test]
async fn test_reference_search_listing() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let (stdout, stderr, success) = run_lectio(&config_path, &["search", "John 3:16"]);
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("John 3:16 (ESV)"));
    assert!(stdout.contains("that he gave his only Son."));
    assert!(stdout.contains("--- Commentary (3) ---"));
    assert!(stdout.contains("--- Documents (1) ---"));
    assert!(stdout.contains("fathers/john.htm"));
}

#[tokio::test]
async fn test_reference_search_json() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let body = run_json(&config_path, &["search", "John 3:15-17 KJV", "--json"]);
    assert_eq!(body["type"], "bible");
    assert_eq!(body["bibleVersion"], "KJV");
    assert_eq!(body["query"], "John 3:15-17 KJV");

    let verses: Vec<u64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["verse"].as_u64().unwrap())
        .collect();
    assert_eq!(verses, vec![15, 16, 17]);
    assert!(body["results"][1]["text"].as_str().unwrap().contains("begotten"));

    // Explicit translation: no full-text fallback.
    assert!(body["documents"].as_array().unwrap().is_empty());
    assert_eq!(body["bookData"]["john"], 42);
    assert_eq!(body["references"][0]["bookName"], "John");
}

#[tokio::test]
async fn test_multiple_references() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let body = run_json(
        &config_path,
        &["search", "compare John 3:16 and Romans 8:28", "--json"],
    );
    let refs: Vec<(u64, u64)> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| (v["book"].as_u64().unwrap(), v["verse"].as_u64().unwrap()))
        .collect();
    assert_eq!(refs, vec![(42, 16), (44, 28)]);
}

#[tokio::test]
async fn test_colon_without_reference() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let body = run_json(&config_path, &["search", "note: grace", "--json"]);
    assert_eq!(body["type"], "bible");
    assert!(body["references"].as_array().unwrap().is_empty());
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_free_text_search_json() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let body = run_json(
        &config_path,
        &["search", "grace AND \"total depravity\"", "--json"],
    );
    assert!(body.get("type").is_none());

    let results = body["results"].as_array().unwrap();
    let mut paths: Vec<&str> = results
        .iter()
        .map(|r| r["filePath"].as_str().unwrap())
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["fathers/depravity.htm", "fathers/grace.htm"]);

    let grace = results
        .iter()
        .find(|r| r["filePath"] == "fathers/grace.htm")
        .unwrap();
    assert_eq!(grace["h1"], "On Grace");
    assert_eq!(grace["breadcrumb"], "Home > Fathers > Augustine");

    let depravity = results
        .iter()
        .find(|r| r["filePath"] == "fathers/depravity.htm")
        .unwrap();
    assert_eq!(depravity["h1"], "No title");
    assert_eq!(depravity["breadcrumb"], "");
}

#[tokio::test]
async fn test_free_text_contexts() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let body = run_json(&config_path, &["search", "grace", "--json"]);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    let contexts = results[0]["contexts"].as_array().unwrap();
    assert_eq!(contexts.len(), 2);
    for ctx in contexts {
        let text = ctx["text"].as_str().unwrap().to_lowercase();
        assert!(text.contains("grace"));
        assert!(ctx["startOffset"].as_u64().unwrap() < ctx["endOffset"].as_u64().unwrap());
    }
}

#[tokio::test]
async fn test_free_text_no_results() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let (stdout, _, success) = run_lectio(&config_path, &["search", "xyzzyplugh"]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[tokio::test]
async fn test_context_by_id() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let body = run_json(&config_path, &["context", "--id", "2", "--json"]);
    assert_eq!(body["h1Text"], "John Chrysostom");
    assert_eq!(body["breadcrumbText"], "Homilies on the Gospel of John");
    assert_eq!(
        body["contexts"][0],
        "Chrysostom on John 3:16: the love of God is shown in the giving of the Son."
    );
}

#[tokio::test]
async fn test_context_missing_id() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let (_, stderr, success) = run_lectio(&config_path, &["context", "--id", "17"]);
    assert!(!success);
    assert!(stderr.contains("no data found for id 17"));
}

#[tokio::test]
async fn test_context_by_file_path() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let body = run_json(
        &config_path,
        &[
            "context",
            "--query",
            "grace",
            "--file-path",
            "fathers/grace.htm",
            "--json",
        ],
    );
    assert_eq!(body["h1Text"], "On Grace");
    assert_eq!(body["breadcrumbText"], "Home>Fathers>Augustine");
    assert_eq!(body["contexts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_context_rejects_bad_paths() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let (_, _, success) = run_lectio(
        &config_path,
        &["context", "--query", "x", "--file-path", "../config/lectio.toml"],
    );
    assert!(!success);

    let (_, stderr, success) = run_lectio(
        &config_path,
        &["context", "--query", "x", "--file-path", "fathers/missing.htm"],
    );
    assert!(!success);
    assert!(stderr.contains("no document found"));

    let (_, stderr, success) = run_lectio(&config_path, &["context", "--query", "x"]);
    assert!(!success);
    assert!(stderr.contains("either id or filePath is required"));

    let (_, stderr, success) =
        run_lectio(&config_path, &["context", "--file-path", "fathers/grace.htm"]);
    assert!(!success);
    assert!(stderr.contains("query is required with filePath"));
}

#[tokio::test]
async fn test_parse_command() {
    let (_tmp, config_path) = setup_test_env("127.0.0.1:0").await;

    let (stdout, _, success) = run_lectio(
        &config_path,
        &["parse", "what does John 3:16-18 say kjv"],
    );
    assert!(success);
    assert!(stdout.contains("kind:        Reference"));
    assert!(stdout.contains("translation: KJV"));
    assert!(stdout.contains("John 3:16-18 (KJV)"));

    let (stdout, _, success) = run_lectio(&config_path, &["parse", "genesis of grace"]);
    assert!(success);
    assert!(stdout.contains("kind:        FreeText"));
    assert!(stdout.contains("translation: ESV (default)"));
    assert!(stdout.contains("references:  none"));
}

#[tokio::test]
async fn test_missing_config_fails() {
    let (_, stderr, success) = run_lectio(Path::new("/nonexistent/lectio.toml"), &["search", "grace"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[tokio::test]
async fn test_missing_database_fails() {
    let (tmp, config_path) = setup_test_env("127.0.0.1:0").await;
    std::fs::remove_file(tmp.path().join("data/commentaries.sqlite")).unwrap();

    let (_, _, success) = run_lectio(&config_path, &["search", "John 3:16"]);
    assert!(!success);
    assert!(!tmp.path().join("data/commentaries.sqlite").exists());
}
