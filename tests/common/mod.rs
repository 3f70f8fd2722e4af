use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn folio_binary() -> &'static str {
    env!("CARGO_BIN_EXE_folio")
}

/// Helper struct to run folio commands in an isolated temp directory
pub struct FolioTest {
    pub temp_dir: TempDir,
}

#[allow(dead_code)]
impl FolioTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        FolioTest { temp_dir }
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(folio_binary());
        command
            .current_dir(self.temp_dir.path())
            .env_remove("FOLIO_ROOT")
            .env_remove("FOLIO_API_URL")
            .env_remove("FOLIO_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute folio command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn read_config(&self) -> String {
        let path = self.temp_dir.path().join(".folio").join("config.yaml");
        fs::read_to_string(path).expect("Failed to read config file")
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".folio");
        fs::create_dir_all(&dir).expect("Failed to create .folio directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }
}
