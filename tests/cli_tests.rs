//! End-to-end tests for the videogate binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with a clean environment, so host `VIDEOGATE_*` settings and
/// config files don't leak into assertions
fn videogate(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("videogate").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("VIDEOGATE_CONFIG")
        .env_remove("VIDEOGATE_FFPROBE_PATH")
        .env_remove("VIDEOGATE_PROBE_TIMEOUT_SECS")
        .env_remove("VIDEOGATE_LOG_LEVEL")
        .env_remove("VIDEOGATE_LOG_FORMAT")
        .env_remove("VIDEOGATE_TEMP_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_check_accepts_supported_and_auto_convertible_names() {
    let dir = TempDir::new().unwrap();
    videogate(&dir)
        .args(["check", "clip.mp4", "clip.mov"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clip.mp4: ok"))
        .stdout(predicate::str::contains("clip.mov: ok"));
}

#[test]
fn test_check_rejects_blocked_container() {
    let dir = TempDir::new().unwrap();
    videogate(&dir)
        .args(["check", "clip.mp4", "clip.flv"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("clip.flv: rejected"))
        .stderr(predicate::str::contains(".FLV files are not supported"));
}

#[test]
fn test_check_json_output() {
    let dir = TempDir::new().unwrap();
    let output = videogate(&dir)
        .args(["check", "--format", "json", "clip.3gp"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["file"], "clip.3gp");
    assert_eq!(value[0]["valid"], false);
    assert!(value[0]["error"].as_str().unwrap().contains(".3GP"));
}

#[test]
fn test_config_file_policy_is_applied() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("videogate.toml"),
        "[policy]\nauto_convertible_extensions = []\n",
    )
    .unwrap();

    videogate(&dir)
        .args(["check", "clip.mkv"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(".MKV"));
}

#[test]
fn test_invalid_policy_fails_at_startup() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[policy]\nsupported_containers = []\n").unwrap();

    videogate(&dir)
        .arg("--config")
        .arg(&config)
        .args(["check", "clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("supported_containers"));
}

#[test]
fn test_policy_prints_defaults() {
    let dir = TempDir::new().unwrap();
    videogate(&dir)
        .arg("policy")
        .assert()
        .success()
        .stdout(predicate::str::contains("[policy]"))
        .stdout(predicate::str::contains("max_bitrate = 20000000"))
        .stdout(predicate::str::contains("\".webm\""));
}

#[test]
fn test_validate_without_ffprobe_warns_but_passes() {
    let dir = TempDir::new().unwrap();
    let clip = dir.path().join("clip.mp4");
    std::fs::write(&clip, b"not really a video").unwrap();

    let output = videogate(&dir)
        .args(["--ffprobe", "/nonexistent/videogate/ffprobe", "validate", "--format", "json"])
        .arg(&clip)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let verdict = &value[0]["verdict"];
    assert_eq!(verdict["isValid"], true);
    assert!(verdict["warnings"][0]
        .as_str()
        .unwrap()
        .starts_with("Could not verify"));
    assert!(verdict.get("mediaInfo").is_none());
}

#[test]
fn test_validate_directory_reports_rejections() {
    let dir = TempDir::new().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    std::fs::write(uploads.join("a.mp4"), b"a").unwrap();
    std::fs::write(uploads.join("b.flv"), b"b").unwrap();

    videogate(&dir)
        .args(["--ffprobe", "/nonexistent/videogate/ffprobe", "validate"])
        .arg(&uploads)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.mp4"))
        .stdout(predicate::str::contains("Status: accepted with warnings"))
        .stdout(predicate::str::contains("Status: rejected (1 errors, 0 warnings)"));
}

#[test]
fn test_validate_with_upload_name() {
    let dir = TempDir::new().unwrap();
    let staged = dir.path().join("upload-8f3a");
    std::fs::write(&staged, b"bytes").unwrap();

    videogate(&dir)
        .args(["validate", "--name", "Leg Day.flv"])
        .arg(&staged)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(".FLV container format is not supported"));
}

#[test]
fn test_probe_timeout_is_range_checked() {
    let dir = TempDir::new().unwrap();
    videogate(&dir)
        .args(["--probe-timeout", "0", "check", "clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("probe-timeout"));
}
