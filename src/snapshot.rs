use crate::cli::{CommonArgs, FetchArgs};
use crate::config::ProfileConfig;
use crate::error::{ProfileError, Result};
use crate::github::{ClientConfig, GitHubClient, ThreadSleeper};
use crate::model::{ProfileData, SCHEMA_VERSION};
use crate::pipeline::{self, PipelineOptions};
use anyhow::Context;
use std::path::{Path, PathBuf};

pub fn exec(common: CommonArgs, fetch: FetchArgs, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(&common)?;
    let data = fetch_profile(&common, &fetch, &config)?;

    match output {
        Some(path) => {
            save(&path, &data).with_context(|| format!("Failed to write {}", path.display()))?
        }
        None => println!("{}", serde_json::to_string_pretty(&data)?),
    }
    Ok(())
}

pub fn load_config(common: &CommonArgs) -> anyhow::Result<ProfileConfig> {
    let mut config =
        ProfileConfig::load(common.config.as_deref()).context("Failed to load config")?;
    if let Some(org) = &common.org {
        config.org = Some(org.clone());
    }
    if let Some(offset) = common.utc_offset {
        config.utc_offset = offset;
    }
    Ok(config)
}

/// Run the network pipeline with the real client.
pub fn fetch_profile(
    common: &CommonArgs,
    fetch: &FetchArgs,
    config: &ProfileConfig,
) -> anyhow::Result<ProfileData> {
    let org = config
        .org
        .clone()
        .filter(|o| !o.is_empty())
        .context("No organization given: pass --org, set ORGFOLIO_ORG or `org` in the config")?;

    let client_config =
        ClientConfig::github(common.token.clone()).with_base_url(common.api_base.clone());
    let client = GitHubClient::new(&client_config).context("Failed to create HTTP client")?;

    let options = PipelineOptions {
        token: client_config.token.clone(),
        repo_type: fetch.repo_type,
        retry: fetch.retry_policy(),
        cooldown: fetch.cooldown,
        warmup_rounds: fetch.warmup_rounds,
        warmup_wait: fetch.warmup_wait,
        utc_offset: config.utc_offset,
        skip_loc: fetch.skip_loc,
        ..PipelineOptions::new(org)
    };

    pipeline::collect(&client, &ThreadSleeper, &options, config)
        .context("Failed to collect statistics")
}

pub fn save(path: &Path, data: &ProfileData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(data)?)?;
    Ok(())
}

pub fn load(path: &Path) -> Result<ProfileData> {
    let text = std::fs::read_to_string(path)?;
    let data: ProfileData = serde_json::from_str(&text)?;
    if data.version != SCHEMA_VERSION {
        return Err(ProfileError::Snapshot(format!(
            "Schema version mismatch: expected {}, found {}",
            SCHEMA_VERSION, data.version
        )));
    }
    Ok(data)
}
