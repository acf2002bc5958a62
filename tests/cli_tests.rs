//! CLI integration tests

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn voice_teller_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voice-teller"))
}

/// Binary with its config directory pointed at a scratch dir
fn isolated_bin(config_home: &Path) -> Command {
    let mut cmd = voice_teller_bin();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("VOICE_TELLER_TRANSCRIBE_URL");
    cmd
}

/// Write a 16-bit stereo test file with hound
fn write_test_wav(path: &Path, frames: &[(i16, i16)]) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &(l, r) in frames {
        writer.write_sample(l).unwrap();
        writer.write_sample(r).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn help_output() {
    let output = voice_teller_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("encode"));
    assert!(stdout.contains("send"));
    assert!(stdout.contains("record"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("config"));
}

#[test]
fn version_output() {
    voice_teller_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-teller"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let dir = TempDir::new().unwrap();
    isolated_bin(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-teller"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_help() {
    let output = voice_teller_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for action in ["init", "set", "get", "list", "path"] {
        assert!(stdout.contains(action), "missing {} in {}", action, stdout);
    }
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();

    isolated_bin(dir.path())
        .args(["config", "set", "persona.institution", "Lakeside Credit Union"])
        .assert()
        .success();

    isolated_bin(dir.path())
        .args(["config", "get", "persona.institution"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lakeside Credit Union"));

    let saved = std::fs::read_to_string(dir.path().join("voice-teller/config.toml")).unwrap();
    assert!(saved.contains("[persona]"));
}

#[test]
fn config_init_writes_defaults() {
    let dir = TempDir::new().unwrap();

    isolated_bin(dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    isolated_bin(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:8000/transcribe"))
        .stdout(predicate::str::contains("wrap"));

    // Second init refuses to overwrite
    isolated_bin(dir.path())
        .args(["config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn encode_writes_canonical_wav() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.wav");
    let output = dir.path().join("output.wav");
    let frames = [(0i16, 0i16), (16384, -16384), (32767, -32768), (-100, 100)];
    write_test_wav(&input, &frames);

    isolated_bin(dir.path())
        .arg("encode")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("output.wav"));

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(bytes.len(), 44 + frames.len() * 2 * 2);
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[36..40], b"data");

    let mut reader = hound::WavReader::open(&output).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    let expected: Vec<i16> = frames
        .iter()
        .flat_map(|&(l, r)| [l, r])
        .map(|s| ((s as f32 / 32768.0) as f64 * 32767.0).trunc() as i16)
        .collect();
    assert_eq!(samples.len(), expected.len());
    for (got, want) in samples.iter().zip(&expected) {
        assert!((got - want).abs() <= 1, "got {}, want {}", got, want);
    }
}

#[test]
fn encode_default_output_name() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("take.wav");
    write_test_wav(&input, &[(1000, -1000); 32]);

    isolated_bin(dir.path())
        .arg("encode")
        .arg(&input)
        .assert()
        .success();

    assert!(dir.path().join("take.pcm16.wav").exists());
}

#[test]
fn inspect_reports_header() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.wav");
    let output = dir.path().join("output.wav");
    write_test_wav(&input, &[(0, 0); 100]);

    isolated_bin(dir.path())
        .arg("encode")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    isolated_bin(dir.path())
        .arg("inspect")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("22050"))
        .stdout(predicate::str::contains("block_align"))
        .stdout(predicate::str::contains("400"));
}

#[test]
fn inspect_flags_truncated_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.wav");
    let output = dir.path().join("output.wav");
    write_test_wav(&input, &[(0, 0); 100]);

    isolated_bin(dir.path())
        .arg("encode")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let bytes = std::fs::read(&output).unwrap();
    std::fs::write(&output, &bytes[..bytes.len() - 10]).unwrap();

    isolated_bin(dir.path())
        .arg("inspect")
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("data size"));
}

#[test]
fn invalid_duration_error() {
    let dir = TempDir::new().unwrap();
    let output = isolated_bin(dir.path())
        .args(["record", "--duration", "invalid", "--no-upload"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid duration"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}

#[test]
fn invalid_quantize_error() {
    let output = voice_teller_bin()
        .args(["encode", "in.wav", "--quantize", "round"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("possible values"),
        "Expected error about invalid quantize mode, got: {}",
        stderr
    );
}

#[test]
fn record_url_conflicts_with_no_upload() {
    voice_teller_bin()
        .args(["record", "--no-upload", "--url", "http://localhost/t"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

// Note: recording itself needs a microphone and is covered by unit tests
// with a mock capture port
