use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test context that provides an isolated temporary directory.
/// Tests can run in parallel because each has its own temp directory and
/// its own settings home.
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Returns the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Settings home used by every command run in this context
    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    /// Run ssl-config in this temp directory
    pub fn run_ssl_config(&self, args: &[&str]) -> CommandResult {
        let mut cmd = Command::cargo_bin("ssl-config").expect("Failed to find ssl-config binary");
        cmd.args(args);
        cmd.current_dir(self.path());
        cmd.env("SSL_CONFIG_HOME", self.home());
        cmd.env("NO_COLOR", "1");

        let output = cmd.output().expect("Failed to execute ssl-config command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }

    /// Get full path to a file in the temp directory
    pub fn file_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.path().join(path)
    }

    /// Read file from temp directory
    pub fn read_file(&self, path: impl AsRef<Path>) -> String {
        let full_path = self.file_path(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Failed to read file: {}", full_path.display()))
    }

    /// Write file to temp directory (creates parent directories)
    pub fn write_file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.file_path(&path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|_| panic!("Failed to create directory: {}", parent.display()));
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|_| panic!("Failed to write file: {}", full_path.display()));
    }

    /// Assert file exists
    pub fn assert_file_exists(&self, path: impl AsRef<Path>) {
        let full_path = self.file_path(&path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert file contains pattern
    pub fn assert_file_contains(&self, path: impl AsRef<Path>, pattern: &str) {
        let content = self.read_file(path);
        assert!(
            content.contains(pattern),
            "Expected file to contain '{}', but it didn't.\n\nContent:\n{}",
            pattern,
            content
        );
    }

    /// Copy the bundled dataset into a dataset directory of this context
    pub fn write_dataset(&self, dir: &str) -> PathBuf {
        let data = bundled_data();

        self.write_file(
            Path::new(dir).join("guidelines.json"),
            &read(&data.join("guidelines.json")),
        );
        self.write_file(
            Path::new(dir).join("configs.js"),
            &read(&data.join("configs.js")),
        );

        for (name, content) in bundled_templates() {
            self.write_file(Path::new(dir).join("templates").join(name), &content);
        }

        self.file_path(dir)
    }

    /// Lay out the bundled dataset the way an ssl-config-generator checkout does
    pub fn write_upstream(&self, dir: &str) -> PathBuf {
        let data = bundled_data();
        let src = Path::new(dir);

        self.write_file(
            src.join("static/guidelines/5.7.json"),
            &read(&data.join("guidelines.json")),
        );
        self.write_file(src.join("static/guidelines/latest.json"), "{}");
        self.write_file(src.join("static/ffdhe2048.txt"), "ffdhe2048\n");
        self.write_file(src.join("static/ffdhe4096.txt"), "ffdhe4096\n");
        self.write_file(src.join("js/configs.js"), &read(&data.join("configs.js")));
        self.write_file(src.join("templates/partials/header.hbs"), "<header>");

        for (name, content) in bundled_templates() {
            self.write_file(src.join("templates/partials").join(name), &content);
        }

        self.file_path(dir)
    }
}

fn bundled_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|_| panic!("Failed to read file: {}", path.display()))
}

fn bundled_templates() -> Vec<(String, String)> {
    let dir = bundled_data().join("templates");

    fs::read_dir(&dir)
        .expect("Failed to list bundled templates")
        .map(|entry| {
            let path = entry.expect("Failed to read template entry").path();
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            (name, read(&path))
        })
        .collect()
}

pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

pub fn assert_success(result: &CommandResult) {
    assert!(
        result.success(),
        "Expected command to succeed but it failed.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        result.stdout,
        result.stderr
    );
}

pub fn assert_failure(result: &CommandResult) {
    assert!(
        !result.success(),
        "Expected command to fail but it succeeded.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        result.stdout,
        result.stderr
    );
}

pub fn assert_output_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stdout.contains(pattern),
        "Expected stdout to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

pub fn assert_error_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stderr.contains(pattern),
        "Expected stderr to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

pub mod edge_cases;
pub mod happy_path;
pub mod smoke;
