use crate::cli::{CommonArgs, FetchArgs};
use crate::config::default_output_path;
use crate::output::{report, write_document, WriteOutcome};
use crate::render::render;
use crate::snapshot::{fetch_profile, load_config, save};
use anyhow::{bail, Context};
use console::style;
use std::path::PathBuf;

pub fn exec(
    common: CommonArgs,
    fetch: FetchArgs,
    output: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    check: bool,
) -> anyhow::Result<()> {
    let config = load_config(&common)?;
    let data = fetch_profile(&common, &fetch, &config)?;

    if let Some(path) = &snapshot {
        save(path, &data).with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    }

    let document = render(&data, &config);
    let path = output.unwrap_or_else(|| default_output_path(common.config.as_deref()));
    let outcome = write_document(&path, &document, check)?;
    report(&path, outcome);

    eprintln!(
        "{} repositories ({} public, {} private), {} contributors, {} languages",
        style(data.total_repos).bold(),
        data.public_repos,
        data.private_repos(),
        data.contributors.len(),
        data.languages.len()
    );
    if !data.unavailable.is_empty() {
        eprintln!(
            "{} statistics unavailable for: {}",
            style("warning:").yellow().bold(),
            data.unavailable.join(", ")
        );
    }

    if outcome == WriteOutcome::Differs {
        bail!("{} is out of date", path.display());
    }
    Ok(())
}
