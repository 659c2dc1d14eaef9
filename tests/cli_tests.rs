use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clipper(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clipper-ai").unwrap();
    cmd.current_dir(workdir)
        .env_remove("RUST_LOG")
        .env_remove("CLIPPER_CONFIG")
        .env_remove("CLIPPER_LOG_LEVEL")
        .env_remove("CLIPPER_MAX_RETRIES")
        .env_remove("CLIPPER_MEDIA_DIR")
        .env_remove("GEMINI_API_KEY");
    cmd
}

fn write_request(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_prompt_renders_selection_request() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "request.json",
        r#"{
            "prompt": "funny moments",
            "videoPath": "talk.mp4",
            "captions": [{"start": 0, "end": 4.25, "text": "Hello there"}],
            "range": [15, 40],
            "variations": 2,
            "number_clips": 1
        }"#,
    );

    clipper(dir.path())
        .args(["prompt", "--request"])
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 * 2 = 2"))
        .stdout(predicate::str::contains("between 15s and 40s long (inclusive)"))
        .stdout(predicate::str::contains("[0.00s - 4.25s] Hello there"));
}

#[test]
fn test_prompt_accepts_yaml_request() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "request.yaml",
        "intent: funny moments\nsourceMediaRef: talk.mp4\ndurationRange: [10, 20]\n",
    );

    clipper(dir.path())
        .args(["prompt", "--request"])
        .arg(&request)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"funny moments\""));
}

#[test]
fn test_prompt_without_intent_fails() {
    let dir = TempDir::new().unwrap();
    let request = write_request(&dir, "request.json", r#"{"videoPath": "talk.mp4"}"#);

    clipper(dir.path())
        .args(["prompt", "--request"])
        .arg(&request)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing intent"));
}

#[test]
fn test_interpret_reports_accepted_and_rejected() {
    let dir = TempDir::new().unwrap();
    let answer = write_request(
        &dir,
        "answer.txt",
        r#"Here are your clips: {"clips":[{"variations":[
            {"start": 12, "end": 27, "reason": "fits"},
            {"start": 50, "end": 52, "reason": "too short"}]}]} Thanks!"#,
    );

    clipper(dir.path())
        .args(["interpret", "--min", "10", "--max", "30", "--response"])
        .arg(&answer)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reason\": \"fits\""))
        .stdout(predicate::str::contains("\"rejected\""))
        .stdout(predicate::str::contains("too short"));
}

#[test]
fn test_interpret_unusable_answer_is_reported() {
    let dir = TempDir::new().unwrap();
    let answer = write_request(&dir, "answer.txt", "I am unable to help with that.");

    clipper(dir.path())
        .args(["interpret", "--response"])
        .arg(&answer)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn test_config_prints_effective_settings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("clipper.toml"),
        "[pipeline]\nmax_retries = 5\n",
    )
    .unwrap();

    clipper(dir.path())
        .env("CLIPPER_URL_PREFIX", "/media/clips")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_retries = 5"))
        .stdout(predicate::str::contains("url_prefix = \"/media/clips\""))
        .stdout(predicate::str::contains("[ai]"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("clipper.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();

    clipper(dir.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid log level"));
}

#[test]
fn test_run_rejects_out_of_range_concurrency() {
    let dir = TempDir::new().unwrap();

    clipper(dir.path())
        .args(["run", "--request", "request.json", "--concurrency", "0"])
        .assert()
        .failure();
}

#[test]
fn test_run_without_intent_prints_error_response() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("src.mp4"), b"video").unwrap();
    let request = write_request(&dir, "request.json", r#"{"videoPath": "src.mp4"}"#);

    for key in [None, Some("test-key")] {
        let mut cmd = clipper(dir.path());
        if let Some(key) = key {
            cmd.env("GEMINI_API_KEY", key);
        }
        cmd.args(["run", "--request"])
            .arg(&request)
            .assert()
            .failure()
            .stdout(predicate::str::contains(r#""error":"Clip generation failed""#))
            .stdout(predicate::str::contains("Missing intent"))
            .stdout(predicate::str::contains("GEMINI_API_KEY").not());
    }
}

#[test]
fn test_run_with_unparseable_request_prints_error_response() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "request.json",
        r#"{"prompt": "x", "videoPath": "src.mp4", "range": "10-30"}"#,
    );

    clipper(dir.path())
        .env("GEMINI_API_KEY", "test-key")
        .args(["run", "--request"])
        .arg(&request)
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""error":"Clip generation failed""#))
        .stdout(predicate::str::contains("Invalid request file"));
}

#[test]
fn test_run_with_missing_request_file_prints_error_response() {
    let dir = TempDir::new().unwrap();

    clipper(dir.path())
        .args(["run", "--request", "absent.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to read request file"));
}

#[test]
fn test_run_with_missing_source_prints_error_response() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        "request.json",
        r#"{"prompt": "funny", "videoPath": "nowhere.mp4"}"#,
    );

    clipper(dir.path())
        .args(["run", "--request"])
        .arg(&request)
        .assert()
        .failure()
        .stdout(predicate::str::contains("File not found"));
}

#[test]
fn test_run_without_api_key_prints_error_response() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("src.mp4"), b"video").unwrap();
    let request = write_request(
        &dir,
        "request.json",
        r#"{"prompt": "funny", "videoPath": "src.mp4"}"#,
    );

    clipper(dir.path())
        .args(["run", "--request"])
        .arg(&request)
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""error":"Clip generation failed""#))
        .stdout(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_run_rejects_oversized_counts() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("src.mp4"), b"video").unwrap();
    let request = write_request(
        &dir,
        "request.json",
        r#"{"prompt": "funny", "videoPath": "src.mp4", "number_clips": 1000, "variations": 1000}"#,
    );

    clipper(dir.path())
        .env("GEMINI_API_KEY", "test-key")
        .args(["run", "--request"])
        .arg(&request)
        .assert()
        .failure()
        .stdout(predicate::str::contains("exceeds 100"));
}
