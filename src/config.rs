//! `profile.toml`: what the document says about the organization.
//!
//! Every field has a default, so an empty file (or no file) is valid.

use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "profile/README.md";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    pub org: Option<String>,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    /// Hours added to UTC when bucketing commits by hour of day.
    pub utc_offset: i32,
    pub timezone_label: Option<String>,
    pub annotate_hour: Option<usize>,
    pub annotation: String,
    /// Free-form Markdown placed below the badges.
    pub intro: Option<String>,
    pub night_callout: String,
    /// Fallback member list when the members API answers partially.
    pub team: Vec<String>,
    pub exclude_authors: Vec<String>,
    pub skip_languages: Vec<String>,
    pub min_loc_code: u64,
    pub badges: Vec<Badge>,
    pub tech: Vec<TechBadge>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub message: String,
    pub color: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechBadge {
    pub name: String,
    pub color: String,
    pub logo: Option<String>,
    #[serde(default = "default_logo_color")]
    pub logo_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub emoji: String,
    pub name: String,
    /// Repository to link, or none for private projects.
    pub repo: Option<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
    #[serde(default)]
    pub stack: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub repo: String,
}

fn default_logo_color() -> String {
    "white".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            org: None,
            title: None,
            tagline: None,
            website: None,
            logo: None,
            utc_offset: 9,
            timezone_label: None,
            annotate_hour: None,
            annotation: String::new(),
            intro: None,
            night_callout: String::new(),
            team: Vec::new(),
            exclude_authors: ["claude", "augmentcode", "github-actions[bot]", "dependabot[bot]"]
                .map(String::from)
                .to_vec(),
            skip_languages: [
                "Markdown",
                "JSON",
                "YAML",
                "TOML",
                "XML",
                "Plain Text",
                "Text",
                "License",
                "SVG",
                "Docker ignore",
                "Gitignore",
            ]
            .map(String::from)
            .to_vec(),
            min_loc_code: 10,
            badges: Vec::new(),
            tech: Vec::new(),
            projects: Vec::new(),
        }
    }
}

impl ProfileConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            ProfileError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
            .map_err(|e| ProfileError::Config(format!("{}: {e}", path.display())))
    }

    /// Label for data bucketed at `offset`. The configured label only
    /// applies when it describes that offset.
    pub fn timezone_label(&self, offset: i32) -> String {
        match &self.timezone_label {
            Some(label) if offset == self.utc_offset => label.clone(),
            _ => format!("UTC{offset:+}"),
        }
    }

    pub fn skips_language(&self, language: &str) -> bool {
        self.skip_languages.iter().any(|l| l == language)
    }
}

/// Where the document goes when `--output` is not given: next to the config
/// file, or under the current directory.
pub fn default_output_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join(DEFAULT_OUTPUT)
}
