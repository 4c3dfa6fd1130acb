use clap::Parser;
use dupemerge::cli::Cli;
use dupemerge::error::{AppError, ExitCode};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Fixture {
    root: TempDir,
    input: PathBuf,
    destination: PathBuf,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempdir().unwrap();
        let input = root.path().join("incoming");
        let destination = root.path().join("library");
        for name in ["unclassified", "unique", "duplicate"] {
            fs::create_dir_all(input.join(name)).unwrap();
        }
        fs::create_dir_all(&destination).unwrap();
        // Empty file so the developer's own configuration never leaks in.
        let config = write(&root.path().join("config.toml"), b"");
        Self {
            root,
            input,
            destination,
            config,
        }
    }

    fn unclassified(&self, name: &str, content: &[u8]) -> PathBuf {
        write(&self.input.join("unclassified").join(name), content)
    }

    fn library(&self, name: &str, content: &[u8]) -> PathBuf {
        write(&self.destination.join(name), content)
    }

    fn config_file(&self, name: &str, content: &str) -> PathBuf {
        write(&self.root.path().join(name), content.as_bytes())
    }

    fn cli(&self, config: &Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            "dupemerge".to_string(),
            self.input.to_string_lossy().into_owned(),
            self.destination.to_string_lossy().into_owned(),
            "--no-progress".to_string(),
            "--config".to_string(),
            config.to_string_lossy().into_owned(),
        ];
        args.extend(extra.iter().map(|s| (*s).to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    fn run(&self, extra: &[&str], answer: &str) -> (anyhow::Result<ExitCode>, String, String) {
        self.run_with_config(&self.config, extra, answer)
    }

    fn run_with_config(
        &self,
        config: &Path,
        extra: &[&str],
        answer: &str,
    ) -> (anyhow::Result<ExitCode>, String, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let mut prompt = Vec::new();
        let result =
            dupemerge::run_app_with(self.cli(config, extra), &mut input, &mut output, &mut prompt);
        (
            result,
            String::from_utf8(output).unwrap(),
            String::from_utf8(prompt).unwrap(),
        )
    }
}

fn write(path: &Path, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

#[test]
fn test_detection_run_reports_unique_and_duplicate() {
    let fx = Fixture::new();
    let new = fx.unclassified("new.jpg", &[1u8; 700]);
    let old = fx.unclassified("old.jpg", &[2u8; 800]);
    let existing = fx.library("2019/old.jpg", &[2u8; 800]);

    let (result, output, prompt) = fx.run(&[], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(prompt.is_empty());
    assert!(output.contains(&format!("Found unique paths:\n{}\n", new.display())));
    assert!(output.contains(&format!(
        "Found duplicate paths:\n{}\n = {}\n",
        old.display(),
        existing.display()
    )));
}

#[test]
fn test_json_output() {
    let fx = Fixture::new();
    fx.unclassified("a/x.bin", &[3u8; 1024]);
    fx.unclassified("b/x.bin", &[3u8; 1024]);
    fx.library("x.bin", &[4u8; 1024]);

    let (result, output, _) = fx.run(&["--output", "json"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["unclassified_duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(value["unique"][0]["files"].as_array().unwrap().len(), 2);
    assert_eq!(value["stats"]["size_collisions"], 1);
    assert!(value["duplicates"].as_array().unwrap().is_empty());
}

#[test]
fn test_nonempty_unique_fails_before_scanning() {
    let fx = Fixture::new();
    fx.unclassified("new.jpg", &[1u8; 700]);
    write(&fx.input.join("unique/leftover.jpg"), b"x");

    let (result, output, _) = fx.run(&[], "");

    let err = result.unwrap_err();
    let app = err.downcast_ref::<AppError>().unwrap();
    assert_eq!(app.kind(), "invalid_input");
    assert_eq!(app.exit_code(), ExitCode::Failure);
    assert_eq!(app.exit_code().as_i32(), 1);
    assert!(output.is_empty());
}

#[test]
fn test_missing_duplicate_directory_fails() {
    let fx = Fixture::new();
    fs::remove_dir(fx.input.join("duplicate")).unwrap();

    let (result, _, _) = fx.run(&[], "");

    let err = result.unwrap_err();
    assert_eq!(err.downcast_ref::<AppError>().unwrap().kind(), "invalid_input");
}

#[test]
fn test_apply_declined_exits_zero_without_scanning() {
    let fx = Fixture::new();
    fx.unclassified("new.jpg", &[1u8; 700]);

    let (result, output, prompt) = fx.run(&["--apply"], "n\n");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(prompt.contains("Do you wish to continue? [n]: "));
    assert!(prompt.contains("Aborting! (n) received."));
    assert!(output.is_empty());
}

#[test]
fn test_apply_end_of_input_aborts() {
    let fx = Fixture::new();

    let (result, output, prompt) = fx.run(&["--apply"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(prompt.contains("Aborting! () received."));
    assert!(output.is_empty());
}

#[test]
fn test_apply_confirmed_detects_only() {
    let fx = Fixture::new();
    let new = fx.unclassified("new.jpg", &[1u8; 700]);

    let (result, output, prompt) = fx.run(&["--apply"], "yes\n");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(prompt.contains("'yes' received, continuing..."));
    assert!(output.contains("Found unique paths:"));
    // Nothing is moved.
    assert!(new.exists());
    assert_eq!(fs::read_dir(fx.input.join("unique")).unwrap().count(), 0);
}

#[test]
fn test_small_files_skipped_by_default() {
    let fx = Fixture::new();
    fx.unclassified("tiny.txt", b"tiny");

    let (result, output, _) = fx.run(&[], "");
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(!output.contains("tiny.txt"));

    let (result, output, _) = fx.run(&["--no-min-size"], "");
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(output.contains("tiny.txt"));
}

#[test]
fn test_git_directories_ignored_in_destination() {
    let fx = Fixture::new();
    let file = fx.unclassified("blob.bin", &[5u8; 600]);
    fx.library(".git/objects/blob.bin", &[5u8; 600]);

    let (result, output, _) = fx.run(&["--output", "json"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["destination"]["total_files"], 0);
    assert_eq!(
        value["unique"][0]["files"][0],
        file.to_string_lossy().as_ref()
    );
}

#[test]
fn test_extra_ignored_directory() {
    let fx = Fixture::new();
    fx.unclassified("blob.bin", &[5u8; 600]);
    fx.library("cache/blob.bin", &[5u8; 600]);

    let (result, output, _) = fx.run(&["--ignore-dir", "cache", "--output", "json"], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["stats"]["unique_files"], 1);
    assert_eq!(value["stats"]["duplicate_files"], 0);
}

#[test]
fn test_config_file_settings_apply() {
    let fx = Fixture::new();
    fx.unclassified("tiny.txt", b"tiny");
    let config = fx.config_file("small.toml", "min_size = 1\n");

    let (result, output, _) = fx.run_with_config(&config, &[], "");

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(output.contains("tiny.txt"));
}

#[test]
fn test_malformed_config_fails_before_scanning() {
    let fx = Fixture::new();
    fx.unclassified("tiny.txt", b"tiny");
    let config = fx.config_file("bad.toml", "min_size = \"zero\"\n");

    let (result, output, prompt) = fx.run_with_config(&config, &["--apply"], "yes\n");

    let err = result.unwrap_err();
    let app = err.downcast_ref::<AppError>().unwrap();
    assert_eq!(app.kind(), "invalid_argument");
    assert_eq!(app.exit_code().as_i32(), 1);
    assert!(output.is_empty());
    assert!(prompt.is_empty());
}

#[test]
fn test_missing_config_file_fails() {
    let fx = Fixture::new();
    fx.unclassified("new.jpg", &[1u8; 700]);
    let config = fx.root.path().join("nope.toml");

    let (result, output, _) = fx.run_with_config(&config, &[], "");

    let err = result.unwrap_err();
    let app = err.downcast_ref::<AppError>().unwrap();
    assert_eq!(app.kind(), "invalid_argument");
    assert!(app.to_string().contains("nope.toml"));
    assert!(output.is_empty());
}
