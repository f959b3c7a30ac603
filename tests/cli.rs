use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// PCM WAV bytes under an arbitrary name; the decoder probes by content.
fn write_audio(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..1600i32 {
        writer.write_sample(((i % 100) * 100 - 5000) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn scenario_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_audio(&root.join("a.mp3"));
    write_audio(&root.join("b.wav"));
    write_audio(&root.join("sub/c.flac"));
    temp_dir
}

fn wavsweep() -> Command {
    Command::cargo_bin("wavsweep").unwrap()
}

#[test]
fn test_default_run_keeps_originals() {
    let temp_dir = scenario_tree();
    let root = temp_dir.path();
    let b_before = fs::read(root.join("b.wav")).unwrap();

    let output = wavsweep().arg("-f").arg(root).arg("-n").arg("2").output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    for name in ["a.mp3", "a.wav", "b.wav", "sub/c.flac", "sub/c.wav"] {
        assert!(root.join(name).exists(), "missing {}", name);
    }
    assert_eq!(fs::read(root.join("b.wav")).unwrap(), b_before);

    let reader = hound::WavReader::open(root.join("sub/c.wav")).unwrap();
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.duration(), 1600);
}

#[test]
fn test_delete_run_removes_converted_sources() {
    let temp_dir = scenario_tree();
    let root = temp_dir.path();

    let output = wavsweep().arg("--folder").arg(root).arg("--delete").output().unwrap();
    assert!(output.status.success());

    assert!(root.join("a.wav").exists());
    assert!(root.join("b.wav").exists());
    assert!(root.join("sub/c.wav").exists());
    assert!(!root.join("a.mp3").exists());
    assert!(!root.join("sub/c.flac").exists());
}

#[test]
fn test_missing_folder_fails_without_touching_anything() {
    let temp_dir = scenario_tree();
    let missing = temp_dir.path().join("nonexistent");

    let output = wavsweep().arg("--folder").arg(&missing).arg("-d").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nonexistent"));

    assert!(temp_dir.path().join("a.mp3").exists());
    assert!(!temp_dir.path().join("a.wav").exists());
}

#[test]
fn test_corrupt_file_is_reported_but_not_fatal() {
    let temp_dir = scenario_tree();
    let root = temp_dir.path();
    fs::write(root.join("broken.ogg"), vec![0x42u8; 2048]).unwrap();

    let output = wavsweep().arg("-f").arg(root).arg("-d").output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed: 1"), "stdout: {}", stdout);
    assert!(stdout.contains("broken.ogg"));
    assert!(root.join("broken.ogg").exists());
    assert!(root.join("a.wav").exists());
    assert!(root.join("sub/c.wav").exists());
}

#[test]
fn test_strict_mode_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.mp3"), vec![0x42u8; 2048]).unwrap();

    let output = wavsweep().arg("-f").arg(temp_dir.path()).arg("--strict").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_extension_filter() {
    let temp_dir = scenario_tree();
    let root = temp_dir.path();

    let output = wavsweep().arg("-f").arg(root).arg("-e").arg("flac").output().unwrap();
    assert!(output.status.success());
    assert!(root.join("sub/c.wav").exists());
    assert!(!root.join("a.wav").exists());
}

#[test]
fn test_save_config_then_run_from_it() {
    let temp_dir = scenario_tree();
    let root = temp_dir.path();
    let config_dir = TempDir::new().unwrap();
    let config_path = config_dir.path().join("wavsweep.toml");

    let output = wavsweep()
        .arg("-f").arg(root)
        .arg("-d")
        .arg("--save-config").arg(&config_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(config_path.exists());
    assert!(root.join("a.mp3").exists());

    let output = wavsweep().arg("-c").arg(&config_path).output().unwrap();
    assert!(output.status.success());
    assert!(root.join("a.wav").exists());
    assert!(!root.join("a.mp3").exists());
}
