use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn vid_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("vid");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    // Dummy video files; only their paths and sizes matter here
    let videos_dir = root.join("videos");
    fs::create_dir_all(&videos_dir).unwrap();
    fs::write(videos_dir.join("alpha.mp4"), b"not a real video").unwrap();
    fs::write(videos_dir.join("beta.mp4"), b"not a real video either").unwrap();
    fs::write(videos_dir.join("gamma.mp4"), b"video without a transcript").unwrap();

    // Transcripts as the speech-to-text pipeline would emit them
    let transcripts_dir = root.join("transcripts");
    fs::create_dir_all(&transcripts_dir).unwrap();
    fs::write(
        transcripts_dir.join("alpha.json"),
        r#"{
            "language": "en",
            "duration": 6.0,
            "segments": [
                {"start": 0.0, "end": 2.0, "text": "the quick brown fox"},
                {"start": 2.0, "end": 4.0, "text": "   "},
                {"start": 4.0, "end": 6.0, "text": "jumps over the lazy dog"}
            ]
        }"#,
    )
    .unwrap();
    fs::write(
        transcripts_dir.join("beta.json"),
        r#"{
            "segments": [
                {"start": 0.0, "end": 3.0, "text": "machine learning lecture intro"},
                {"start": 3.0, "end": 6.0, "text": "gradient descent explained"}
            ]
        }"#,
    )
    .unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/vidscribe.db"

[search]
limit = 50

[transcription]
model = "base"
"#,
        root.display()
    );

    let config_path = root.join("vidscribe.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_vid(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = vid_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run vid binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn video(tmp: &TempDir, name: &str) -> String {
    tmp.path().join("videos").join(name).display().to_string()
}

fn transcripts(tmp: &TempDir) -> String {
    tmp.path().join("transcripts").display().to_string()
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_vid(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data").join("vidscribe.db").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_vid(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_vid(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_batch_indexes_transcripts() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let beta = video(&tmp, "beta.mp4");

    run_vid(&config_path, &["init"]);
    let (stdout, stderr, success) = run_vid(
        &config_path,
        &["batch", &transcripts(&tmp), &alpha, &beta],
    );
    assert!(success, "batch failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("videos queued: 2"), "got: {}", stdout);
    assert!(stdout.contains("completed: 2"), "got: {}", stdout);
    assert!(stdout.contains("failed: 0"), "got: {}", stdout);
    assert!(stdout.contains("ok"));

    let (stdout, _, _) = run_vid(&config_path, &["search", &beta, "gradient descent"]);
    assert!(stdout.contains("<mark>"), "got: {}", stdout);
    assert!(stdout.contains("1 result"), "got: {}", stdout);
}

#[test]
fn test_batch_deduplicates_videos() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");

    run_vid(&config_path, &["init"]);
    let (stdout, _, success) = run_vid(
        &config_path,
        &["batch", &transcripts(&tmp), &alpha, &alpha],
    );
    assert!(success);
    assert!(stdout.contains("videos queued: 1"), "got: {}", stdout);
    assert!(stdout.contains("completed: 1"), "got: {}", stdout);
}

#[test]
fn test_batch_continues_past_missing_transcript() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let gamma = video(&tmp, "gamma.mp4");

    run_vid(&config_path, &["init"]);
    let (stdout, stderr, success) = run_vid(
        &config_path,
        &["batch", &transcripts(&tmp), &gamma, &alpha],
    );
    assert!(success, "batch failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("failed: 1"), "got: {}", stdout);
    assert!(stdout.contains("completed: 1"), "got: {}", stdout);
    assert!(stdout.contains("error:"), "got: {}", stdout);

    // The healthy item landed despite the earlier failure
    let (stdout, _, _) = run_vid(&config_path, &["search", &alpha, "lazy dog"]);
    assert!(stdout.contains("1 result"), "got: {}", stdout);
}

#[test]
fn test_import_drops_blank_segments() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let transcript = tmp.path().join("transcripts").join("alpha.json");

    run_vid(&config_path, &["init"]);
    let (stdout, stderr, success) = run_vid(
        &config_path,
        &["import", &alpha, transcript.to_str().unwrap()],
    );
    assert!(success, "import failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("segments read: 3"), "got: {}", stdout);
    assert!(stdout.contains("segments indexed: 2"), "got: {}", stdout);
    assert!(stdout.contains("ok"));
}

#[test]
fn test_search_prints_timestamps_and_highlights() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let transcript = tmp.path().join("transcripts").join("alpha.json");

    run_vid(&config_path, &["init"]);
    run_vid(
        &config_path,
        &["import", &alpha, transcript.to_str().unwrap()],
    );

    let (stdout, _, success) = run_vid(&config_path, &["search", &alpha, "quick brown"]);
    assert!(success);
    assert!(stdout.contains("[0:00 - 0:02]"), "got: {}", stdout);
    assert!(stdout.contains("<mark>"), "got: {}", stdout);
    assert!(stdout.contains("1 result"), "got: {}", stdout);
}

#[test]
fn test_search_empty_query() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");

    run_vid(&config_path, &["init"]);
    let (stdout, _, success) = run_vid(&config_path, &["search", &alpha, ""]);
    assert!(success, "Empty query should not fail");
    assert!(stdout.contains("No results"));
}

#[test]
fn test_search_unindexed_video() {
    let (tmp, config_path) = setup_test_env();
    let gamma = video(&tmp, "gamma.mp4");

    run_vid(&config_path, &["init"]);
    let (stdout, _, success) = run_vid(&config_path, &["search", &gamma, "anything"]);
    assert!(success);
    assert!(stdout.contains("No results"));
}

#[test]
fn test_segments_lists_stored_order() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let transcript = tmp.path().join("transcripts").join("alpha.json");

    run_vid(&config_path, &["init"]);
    run_vid(
        &config_path,
        &["import", &alpha, transcript.to_str().unwrap()],
    );

    let (stdout, _, success) = run_vid(&config_path, &["segments", &alpha]);
    assert!(success);
    assert!(stdout.contains("Segments (2)"), "got: {}", stdout);
    let fox = stdout.find("the quick brown fox").unwrap();
    let dog = stdout.find("jumps over the lazy dog").unwrap();
    assert!(fox < dog, "segments out of order: {}", stdout);
}

#[test]
fn test_segments_unindexed_video() {
    let (tmp, config_path) = setup_test_env();
    let gamma = video(&tmp, "gamma.mp4");

    run_vid(&config_path, &["init"]);
    let (stdout, _, success) = run_vid(&config_path, &["segments", &gamma]);
    assert!(success);
    assert!(stdout.contains("not indexed"), "got: {}", stdout);
}

#[test]
fn test_videos_lists_indexed() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let transcript = tmp.path().join("transcripts").join("alpha.json");

    run_vid(&config_path, &["init"]);
    let (stdout, _, _) = run_vid(&config_path, &["videos"]);
    assert!(stdout.contains("No videos indexed"));

    run_vid(
        &config_path,
        &["import", &alpha, transcript.to_str().unwrap()],
    );
    let (stdout, _, success) = run_vid(&config_path, &["videos"]);
    assert!(success);
    assert!(stdout.contains("alpha.mp4"), "got: {}", stdout);
    assert!(stdout.contains("1 video"), "got: {}", stdout);
}

#[test]
fn test_remove_video() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let transcript = tmp.path().join("transcripts").join("alpha.json");

    run_vid(&config_path, &["init"]);
    run_vid(
        &config_path,
        &["import", &alpha, transcript.to_str().unwrap()],
    );

    let (stdout, _, success) = run_vid(&config_path, &["remove", &alpha]);
    assert!(success);
    assert!(stdout.contains("removed"), "got: {}", stdout);

    let (stdout, _, _) = run_vid(&config_path, &["search", &alpha, "fox"]);
    assert!(stdout.contains("No results"));

    // Removing again reports there is nothing to remove
    let (stdout, _, success) = run_vid(&config_path, &["remove", &alpha]);
    assert!(success);
    assert!(stdout.contains("not indexed"), "got: {}", stdout);
}

#[test]
fn test_stats_reports_counts() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let transcript = tmp.path().join("transcripts").join("alpha.json");

    run_vid(&config_path, &["init"]);
    run_vid(
        &config_path,
        &["import", &alpha, transcript.to_str().unwrap()],
    );

    let (stdout, _, success) = run_vid(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Store Stats"), "got: {}", stdout);
    assert!(stdout.contains("Videos:     1"), "got: {}", stdout);
    assert!(stdout.contains("Segments:   2"), "got: {}", stdout);
}

#[test]
fn test_optimize_runs() {
    let (tmp, config_path) = setup_test_env();
    let alpha = video(&tmp, "alpha.mp4");
    let transcript = tmp.path().join("transcripts").join("alpha.json");

    run_vid(&config_path, &["init"]);
    run_vid(
        &config_path,
        &["import", &alpha, transcript.to_str().unwrap()],
    );
    run_vid(&config_path, &["remove", &alpha]);

    let (stdout, stderr, success) = run_vid(&config_path, &["optimize"]);
    assert!(
        success,
        "optimize failed: stdout={}, stderr={}",
        stdout, stderr
    );
    assert!(stdout.contains("Store optimized"), "got: {}", stdout);
}
