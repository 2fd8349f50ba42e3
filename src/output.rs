use anyhow::{Context, Result};
use console::style;
use similar::{ChangeTag, TextDiff};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
    Differs,
}

/// Write `contents` to `path`, or with `check` only compare and print a diff.
pub fn write_document(path: &Path, contents: &str, check: bool) -> Result<WriteOutcome> {
    let existing = match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };

    if existing.as_deref() == Some(contents) {
        return Ok(WriteOutcome::Unchanged);
    }

    if check {
        print_diff(path, existing.as_deref().unwrap_or(""), contents);
        return Ok(WriteOutcome::Differs);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(WriteOutcome::Written)
}

fn print_diff(path: &Path, old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    println!("{}", style(format!("--- {}", path.display())).bold());
    println!("{}", style("+++ generated").bold());
    for group in diff.grouped_ops(3) {
        for op in group {
            for change in diff.iter_changes(&op) {
                let line = change.to_string_lossy();
                match change.tag() {
                    ChangeTag::Delete => print!("{}", style(format!("-{line}")).red()),
                    ChangeTag::Insert => print!("{}", style(format!("+{line}")).green()),
                    ChangeTag::Equal => print!(" {line}"),
                }
                if change.missing_newline() {
                    println!();
                }
            }
        }
    }
}

/// Human summary for the end of a run.
pub fn report(path: &Path, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Written => {
            eprintln!("{} {}", style("Written").green().bold(), path.display())
        }
        WriteOutcome::Unchanged => eprintln!("{} {}", style("Up to date").green(), path.display()),
        WriteOutcome::Differs => {
            eprintln!("{} {}", style("Out of date").yellow().bold(), path.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_creating_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile/README.md");
        assert_eq!(write_document(&path, "hi\n", false).unwrap(), WriteOutcome::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi\n");
        assert_eq!(write_document(&path, "hi\n", false).unwrap(), WriteOutcome::Unchanged);
    }

    #[test]
    fn check_never_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, "old\n").unwrap();
        assert_eq!(write_document(&path, "new\n", true).unwrap(), WriteOutcome::Differs);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\n");
        assert_eq!(write_document(&path, "old\n", true).unwrap(), WriteOutcome::Unchanged);
    }
}
