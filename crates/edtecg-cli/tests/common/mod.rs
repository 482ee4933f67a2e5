use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Isolated credential store for one test.
pub struct TestEnv {
    _dir: TempDir,
    pub store: PathBuf,
    pub api_url: String,
}

impl TestEnv {
    pub fn new(api_url: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("credentials.json");
        Self {
            _dir: dir,
            store,
            api_url: api_url.to_string(),
        }
    }

    /// Seed the store as if a login had happened.
    pub fn with_tokens(self, access: &str, refresh: &str) -> Self {
        let json = serde_json::json!({"accessToken": access, "refreshToken": refresh});
        std::fs::write(&self.store, json.to_string()).unwrap();
        self
    }

    pub fn stored(&self) -> serde_json::Value {
        read_store(&self.store)
    }

    /// Run the CLI binary against this environment.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_edtecg"));
        cmd.args(args);
        cmd.env("EDTECG_API_URL", &self.api_url);
        cmd.env("EDTECG_STORE", &self.store);
        cmd.env_remove("EDTECG_PASSWORD");
        cmd.env("NO_COLOR", "1");
        cmd.output().expect("Failed to execute CLI")
    }

    /// Run the CLI and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}

/// Read the credential file; a missing file is an empty object.
pub fn read_store(path: &Path) -> serde_json::Value {
    match std::fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap(),
        Err(_) => serde_json::json!({}),
    }
}
