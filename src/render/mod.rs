pub mod document;

pub use document::{render, total_code};

use crate::cli::CommonArgs;
use crate::config::default_output_path;
use crate::output::{report, write_document, WriteOutcome};
use crate::snapshot::load_config;
use anyhow::{bail, Context};
use std::path::PathBuf;
use tracing::warn;

pub fn exec(
    common: CommonArgs,
    from: PathBuf,
    output: Option<PathBuf>,
    check: bool,
) -> anyhow::Result<()> {
    let config = load_config(&common)?;
    let data = crate::snapshot::load(&from)
        .with_context(|| format!("Failed to load snapshot {}", from.display()))?;

    // The histogram was shifted when the snapshot was taken.
    let offset_requested = common.utc_offset.is_some() || common.config.is_some();
    if offset_requested && config.utc_offset != data.utc_offset {
        warn!(
            requested = config.utc_offset,
            snapshot = data.utc_offset,
            "snapshot was bucketed with a different UTC offset, keeping the snapshot's"
        );
    }

    let document = render(&data, &config);
    let path = output.unwrap_or_else(|| default_output_path(common.config.as_deref()));
    let outcome = write_document(&path, &document, check)?;
    report(&path, outcome);

    if outcome == WriteOutcome::Differs {
        bail!("{} is out of date", path.display());
    }
    Ok(())
}
