use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::builders::ManifestBuilder;

/// TestHarness provides an isolated Unity-style project tree.
/// Each harness creates a temporary directory with an `Assets/` folder; the
/// directory is removed when the harness is dropped.
pub struct TestHarness {
    pub dir: TempDir,
    pub assets_dir: PathBuf,
    pub binary: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let assets_dir = dir.path().join("Assets");
        fs::create_dir_all(&assets_dir).expect("Failed to create Assets dir");

        TestHarness {
            dir,
            assets_dir,
            binary: PathBuf::from(env!("CARGO_BIN_EXE_asmguard")),
        }
    }

    /// Returns the project root (the TempDir path).
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `Assets/<name>/<name>.asmdef` for a module and its references.
    pub fn add_module(&self, name: &str, references: &[&str]) -> PathBuf {
        let content = ManifestBuilder::new(name)
            .with_references(references)
            .build();
        self.write_file(&format!("Assets/{}/{}.asmdef", name, name), &content)
    }

    /// Writes an arbitrary file relative to the project root.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Writes the project config at `.asmguard/config.md`.
    #[allow(dead_code)]
    pub fn write_config(&self, frontmatter: &str) {
        self.write_file(
            ".asmguard/config.md",
            &format!("---\n{}\n---\n\n# Module conventions\n", frontmatter),
        );
    }

    /// Executes the asmguard binary in the project root with an isolated HOME
    /// and colors disabled.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary)
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path().join("home"))
            .env("NO_COLOR", "1")
            .env_remove("ASMGUARD_LOG")
            .env_remove("ASMGUARD_QUIET")
            .output()
            .expect("Failed to run asmguard")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
