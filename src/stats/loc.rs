use super::aggregate::Aggregator;
use crate::error::{ProfileError, Result};
use crate::model::{LocCounts, Repository};
use crate::util::progress_bar;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// One language row of `scc --format json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SccEntry {
    pub name: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub code: u64,
    #[serde(default)]
    pub comment: u64,
    #[serde(default)]
    pub blank: u64,
}

impl SccEntry {
    pub fn counts(&self) -> LocCounts {
        LocCounts {
            files: self.count,
            code: self.code,
            comments: self.comment,
            blanks: self.blank,
        }
    }
}

pub fn parse_scc(json: &str) -> Result<Vec<SccEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Embed `token` into an https clone URL.
pub fn authenticated_url(clone_url: &str, token: &str) -> String {
    match clone_url.strip_prefix("https://") {
        Some(rest) => format!("https://x-access-token:{token}@{rest}"),
        None => clone_url.to_string(),
    }
}

/// Counts lines of code by shallow-cloning each repository and running `scc`.
pub struct LocCounter {
    token: Option<String>,
    timeout: Duration,
}

impl LocCounter {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn clone_url(&self, repo: &Repository) -> String {
        match &self.token {
            Some(token) if repo.private => authenticated_url(&repo.clone_url, token),
            _ => repo.clone_url.clone(),
        }
    }

    /// Clone and count every repository; failures skip that repository only.
    pub fn count_all(&self, repos: &[Repository], agg: &mut Aggregator) -> Result<()> {
        let workdir = tempfile::tempdir()?;
        let pb = progress_bar(repos.len() as u64, "Counting lines of code");
        for repo in repos {
            pb.set_message(repo.name.clone());
            match self.count_repository(repo, workdir.path()) {
                Ok(entries) => {
                    info!(repo = %repo.name, languages = entries.len(), "counted lines of code");
                    agg.add_loc(entries.iter().map(|e| (e.name.as_str(), e.counts())));
                }
                Err(e) => {
                    warn!(
                        repo = %repo.name,
                        private = repo.private,
                        error = %e,
                        "lines of code skipped"
                    );
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(())
    }

    pub fn count_repository(&self, repo: &Repository, workdir: &Path) -> Result<Vec<SccEntry>> {
        let dest = workdir.join(&repo.name);

        let mut git = Command::new("git");
        git.args(["clone", "--depth=1", "-q"])
            .arg(self.clone_url(repo))
            .arg(&dest)
            .env("GIT_TERMINAL_PROMPT", "0");
        if self.token.is_some() {
            git.env("GIT_ASKPASS", "/bin/echo");
        }
        let output = run_with_timeout(&mut git, self.timeout)
            .map_err(|e| ProfileError::subprocess("git clone", e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProfileError::subprocess("git clone", self.redact(stderr.trim())));
        }

        let mut scc = Command::new("scc");
        scc.args(["--format", "json"]).arg(&dest);
        let output = run_with_timeout(&mut scc, self.timeout)
            .map_err(|e| ProfileError::subprocess("scc", e.to_string()))?;
        if !output.status.success() {
            return Err(ProfileError::subprocess(
                "scc",
                format!("exited with {}", output.status),
            ));
        }
        parse_scc(&String::from_utf8_lossy(&output.stdout))
    }

    fn redact(&self, message: &str) -> String {
        match &self.token {
            Some(token) => message.replace(token.as_str(), "***"),
            None => message.to_string(),
        }
    }
}

/// Run `cmd` to completion, killing it once `timeout` elapses.
fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> std::io::Result<Output> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain pipes on helper threads so a chatty child cannot block on a full pipe.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let drain = |pipe: Option<Box<dyn Read + Send>>| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut pipe) = pipe {
                let _ = pipe.read_to_end(&mut buf);
            }
            buf
        })
    };
    let out_handle = drain(stdout.map(|p| Box::new(p) as Box<dyn Read + Send>));
    let err_handle = drain(stderr.map(|p| Box::new(p) as Box<dyn Read + Send>));

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            debug!(?timeout, "subprocess timed out, killing");
            let _ = child.kill();
            let _ = child.wait();
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("timed out after {}", humantime::format_duration(timeout)),
            ));
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    Ok(Output {
        status,
        stdout: out_handle.join().unwrap_or_default(),
        stderr: err_handle.join().unwrap_or_default(),
    })
}
