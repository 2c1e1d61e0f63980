//! Step outputs, environment, `PATH` and job summary for GitHub Actions.
//!
//! Each channel is a file the runner names through an environment variable.
//! Outside a runner the files are unset and everything is printed instead.

use oc_lifecycle::{LifecycleError, LifecycleResult, Publisher};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
pub const GITHUB_ENV: &str = "GITHUB_ENV";
pub const GITHUB_PATH: &str = "GITHUB_PATH";
pub const GITHUB_STEP_SUMMARY: &str = "GITHUB_STEP_SUMMARY";

const MULTILINE_DELIMITER: &str = "OMNI_CACHE_EOF";

#[derive(Debug, Default, Clone)]
pub struct GithubPublisher {
    output_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
}

impl GithubPublisher {
    pub fn from_env() -> Self {
        Self {
            output_file: file_from_env(GITHUB_OUTPUT),
            env_file: file_from_env(GITHUB_ENV),
            path_file: file_from_env(GITHUB_PATH),
            summary_file: file_from_env(GITHUB_STEP_SUMMARY),
        }
    }

    fn write_entry(
        file: Option<&Path>,
        what: &str,
        name: &str,
        value: &str,
    ) -> LifecycleResult<()> {
        match file {
            Some(path) => append(path, &key_value(name, value))
                .map_err(|e| LifecycleError::publish(format!("{what} {name}"), e)),
            None => {
                println!("{name}={value}");
                Ok(())
            }
        }
    }
}

impl Publisher for GithubPublisher {
    fn set_output(&mut self, name: &str, value: &str) -> LifecycleResult<()> {
        Self::write_entry(self.output_file.as_deref(), "output", name, value)
    }

    fn export_variable(&mut self, name: &str, value: &str) -> LifecycleResult<()> {
        Self::write_entry(self.env_file.as_deref(), "variable", name, value)
    }

    fn add_path(&mut self, dir: &Path) -> LifecycleResult<()> {
        let dir = dir.display().to_string();
        match self.path_file {
            Some(ref path) => append(path, &format!("{dir}\n"))
                .map_err(|e| LifecycleError::publish(format!("path entry {dir}"), e)),
            None => {
                println!("PATH+={dir}");
                Ok(())
            }
        }
    }

    fn append_summary(&mut self, markdown: &str) -> LifecycleResult<()> {
        match self.summary_file {
            Some(ref path) => append(path, &with_newline(markdown))
                .map_err(|e| LifecycleError::publish("job summary", e)),
            None => {
                print!("{}", with_newline(markdown));
                Ok(())
            }
        }
    }

    fn group(&mut self, title: &str, body: &str) {
        println!("::group::{title}");
        print!("{}", with_newline(body));
        println!("::endgroup::");
    }
}

fn file_from_env(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// `name=value`, or the heredoc form when the value spans lines.
pub fn key_value(name: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n")
    } else {
        format!("{name}={value}\n")
    }
}

fn with_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

fn append(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())
}
