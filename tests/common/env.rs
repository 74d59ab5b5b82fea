//! Test environment builder for isolated Berth runs.
//!
//! Provides `TestEnv` - a temp project directory with a `berth.toml`, a
//! separate temp HOME, and a fake container runtime standing in for docker.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

use super::fake_runtime::{write_fake_runtime, RuntimeBehavior};

/// Result of running the berth binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn events(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON: {l}: {e}"))
            })
            .collect()
    }

    /// Status reported for `step` in a `--json` run
    pub fn step_status(&self, step: &str) -> Option<String> {
        self.events()
            .into_iter()
            .find(|e| e["event"] == "step" && e["phase"] == "finish" && e["step"] == step)
            .and_then(|e| e["status"].as_str().map(str::to_string))
    }
}

pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    runtime_log: PathBuf,
    bin_dir: PathBuf,
    berth_bin: PathBuf,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Run berth from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run berth from the project root with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        // Fake sg/sudo shadow the real ones
        let path = match std::env::var_os("PATH") {
            Some(existing) => {
                let mut dirs = vec![self.bin_dir.clone()];
                dirs.extend(std::env::split_paths(&existing));
                std::env::join_paths(dirs).expect("PATH entries should join")
            }
            None => self.bin_dir.clone().into_os_string(),
        };

        let mut cmd = Command::new(&self.berth_bin);
        cmd.current_dir(self.project_root.path())
            .env("PATH", path)
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("BERTH_DOMAIN")
            .env_remove("BERTH_EMAIL")
            .env_remove("BERTH_ALIASES")
            .env_remove("BERTH_LOG");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute berth");
        to_result(output)
    }

    /// Every runtime invocation so far, one line of arguments each
    pub fn runtime_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.runtime_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn clear_runtime_calls(&self) {
        let _ = fs::remove_file(&self.runtime_log);
    }

    pub fn installed_config(&self) -> String {
        fs::read_to_string(self.project_path("nginx/conf.d/example.com.conf"))
            .expect("proxy configuration should be installed")
    }

    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        let full_path = self.project_path(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&full_path, content).expect("Failed to write file");
    }
}

fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    config: Option<String>,
    behavior: RuntimeBehavior,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            behavior: RuntimeBehavior::default(),
        }
    }

    /// Replace the generated `berth.toml`. `{runtime}` expands to the fake
    /// runtime's path.
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config = Some(toml.to_string());
        self
    }

    pub fn with_runtime(mut self, behavior: RuntimeBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn build(self) -> TestEnv {
        let project_root = TempDir::new().expect("Failed to create project dir");
        let home_dir = TempDir::new().expect("Failed to create home dir");

        let runtime_log = project_root.path().join("runtime.log");
        let bin_dir = project_root.path().join("bin");
        let runtime = write_fake_runtime(project_root.path(), &runtime_log, &self.behavior);

        let config = self
            .config
            .unwrap_or_else(default_config)
            .replace("{runtime}", &runtime.display().to_string());
        fs::write(project_root.path().join("berth.toml"), config)
            .expect("Failed to write berth.toml");

        TestEnv {
            project_root,
            home_dir,
            runtime_log,
            bin_dir,
            berth_bin: PathBuf::from(env!("CARGO_BIN_EXE_berth")),
        }
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_config() -> String {
    r#"domain = "example.com"
email = "ops@example.com"

[runtime]
program = "{runtime}"
strategy = "direct"
probe_timeout_secs = 5
"#
    .to_string()
}
