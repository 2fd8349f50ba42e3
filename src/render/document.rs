use crate::config::ProfileConfig;
use crate::model::{LocCounts, ProfileData};
use crate::util::{bar, format_thousands, hour_label, percent, BAR_WIDTH};

const BADGE_BASE: &str = "https://img.shields.io/badge";

/// Commit-time periods: emoji, name, hour label, hour range.
const PERIODS: [(&str, &str, &str, std::ops::Range<usize>); 4] = [
    ("🌙", "Night", "12–5 AM", 0..6),
    ("☀️", "Morning", "6–11 AM", 6..12),
    ("🌤️", "Afternoon", "12–5 PM", 12..18),
    ("🌆", "Evening", "6–11 PM", 18..24),
];

/// Render the profile document. Pure: the same inputs always give the same bytes.
pub fn render(data: &ProfileData, config: &ProfileConfig) -> String {
    let mut doc = Document::default();
    header(&mut doc, config);
    badges(&mut doc, data, config);
    if let Some(intro) = &config.intro {
        doc.line(intro.trim_end());
        doc.blank();
    }
    commit_hours(&mut doc, data, config);
    lines_of_code(&mut doc, data, config);
    tech_stack(&mut doc, data, config);
    contributors(&mut doc, data);
    projects(&mut doc, data, config);
    team(&mut doc, &data.members);
    doc.finish()
}

#[derive(Default)]
struct Document {
    lines: Vec<String>,
}

impl Document {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Escape text for a shields.io badge path segment.
fn badge_escape(text: &str) -> String {
    text.replace('-', "--")
        .replace('_', "__")
        .replace(' ', "%20")
        .replace(',', "%2C")
}

fn badge(label: &str, message: &str, color: &str, alt: &str) -> String {
    format!(
        r#"  <img src="{BADGE_BASE}/{}-{}-{color}?style=flat-square" alt="{alt}">"#,
        badge_escape(label),
        badge_escape(message)
    )
}

fn header(doc: &mut Document, config: &ProfileConfig) {
    let name = config.title.as_deref().or(config.org.as_deref());

    match (&config.logo, name) {
        (Some(logo), name) => {
            doc.line(r#"<p align="center">"#);
            let img = format!(
                r#"<img src="{logo}" alt="{}" width="240">"#,
                name.unwrap_or("logo")
            );
            match &config.website {
                Some(site) => {
                    doc.line(format!(r#"  <a href="{site}">"#));
                    doc.line(format!("    {img}"));
                    doc.line("  </a>");
                }
                None => doc.line(format!("  {img}")),
            }
            doc.line("</p>");
            doc.blank();
        }
        (None, Some(name)) => {
            doc.line(format!(r#"<h1 align="center">{name}</h1>"#));
            doc.blank();
        }
        (None, None) => {}
    }

    if let Some(tagline) = &config.tagline {
        doc.line(r#"<p align="center">"#);
        doc.line(format!("  <strong>{tagline}</strong>"));
        doc.line("</p>");
        doc.blank();
    }

    let mut links = Vec::new();
    if let Some(site) = &config.website {
        links.push(format!(r#"<a href="{site}">Website</a>"#));
    }
    if let Some(org) = &config.org {
        links.push(format!(
            r#"<a href="https://github.com/orgs/{}/repositories">Repositories</a>"#,
            org.to_lowercase()
        ));
    }
    if !links.is_empty() {
        doc.line(r#"<p align="center">"#);
        doc.line(format!("  {}", links.join(" · ")));
        doc.line("</p>");
        doc.blank();
    }
}

/// Total code lines over programming languages only.
pub fn total_code(data: &ProfileData, config: &ProfileConfig) -> u64 {
    data.loc
        .iter()
        .filter(|(lang, _)| !config.skips_language(lang))
        .map(|(_, c)| c.code)
        .sum()
}

fn badges(doc: &mut Document, data: &ProfileData, config: &ProfileConfig) {
    doc.line(r#"<p align="center">"#);
    // every listed repository counts, whether or not its statistics arrived
    doc.line(badge("repos", &data.total_repos.to_string(), "blue", "Repos"));
    doc.line(badge("team", &data.members.len().to_string(), "green", "Team"));
    for b in &config.badges {
        let alt = b.alt.as_deref().unwrap_or(&b.label);
        doc.line(badge(&b.label, &b.message, &b.color, alt));
    }
    if !data.loc.is_empty() {
        let total = format_thousands(total_code(data, config));
        doc.line(badge("lines of code", &total, "orange", "LOC"));
    }
    doc.line("</p>");
    doc.blank();
    doc.line("---");
    doc.blank();
}

fn commit_hours(doc: &mut Document, data: &ProfileData, config: &ProfileConfig) {
    let hours = &data.hours;
    doc.line("### ⏰ When we code");
    doc.blank();
    doc.line(format!(
        "Commit activity across all repositories ({}):",
        config.timezone_label(data.utc_offset)
    ));
    doc.blank();
    doc.line("```");
    let max = hours.max();
    for hour in 0..24 {
        let count = hours.get(hour);
        let mut row = format!("{}  {} {count:2}", hour_label(hour), bar(count, max, BAR_WIDTH));
        if config.annotate_hour == Some(hour) && !config.annotation.is_empty() {
            row.push_str("  ");
            row.push_str(&config.annotation);
        }
        doc.line(row);
    }
    doc.line("```");
    doc.blank();

    let total = hours.total();
    doc.line("| Period | Hours | Commits | Share |");
    doc.line("|--------|-------|--------:|------:|");
    for (emoji, name, label, range) in PERIODS {
        let count = hours.sum_range(range);
        doc.line(format!(
            "| {emoji} {name} | {label} | {count} | {}% |",
            percent(count, total)
        ));
    }
    doc.blank();

    let night = percent(hours.sum_range(PERIODS[0].3.clone()), total);
    let mut callout = format!("> **{night}%** of all commits land between midnight and 5 AM.");
    if !config.night_callout.is_empty() {
        callout.push(' ');
        callout.push_str(&config.night_callout);
    }
    doc.line(callout);
    doc.blank();
}

fn lines_of_code(doc: &mut Document, data: &ProfileData, config: &ProfileConfig) {
    if data.loc.is_empty() {
        return;
    }
    doc.line("### 📊 Lines of code");
    doc.blank();
    doc.line("| Language | Files | Code | Comments | Blanks |");
    doc.line("|----------|------:|-----:|---------:|-------:|");
    let mut total = LocCounts::default();
    for (lang, counts) in data.loc.iter() {
        if counts.code < config.min_loc_code || config.skips_language(lang) {
            continue;
        }
        total += *counts;
        doc.line(format!(
            "| {lang} | {} | {} | {} | {} |",
            format_thousands(counts.files),
            format_thousands(counts.code),
            format_thousands(counts.comments),
            format_thousands(counts.blanks)
        ));
    }
    doc.line(format!(
        "| **Total** | **{}** | **{}** | **{}** | **{}** |",
        format_thousands(total.files),
        format_thousands(total.code),
        format_thousands(total.comments),
        format_thousands(total.blanks)
    ));
    doc.blank();
}

fn tech_stack(doc: &mut Document, data: &ProfileData, config: &ProfileConfig) {
    if data.languages.is_empty() && config.tech.is_empty() {
        return;
    }
    doc.line("### 💻 Tech stack");
    doc.blank();
    if !data.languages.is_empty() {
        doc.line("```mermaid");
        doc.line("pie title Codebase by language (bytes)");
        for (lang, bytes) in data.languages.iter() {
            doc.line(format!(r#"    "{lang}" : {bytes}"#));
        }
        doc.line("```");
        doc.blank();
    }
    if !config.tech.is_empty() {
        doc.line("<p>");
        for tech in &config.tech {
            let logo = tech
                .logo
                .as_deref()
                .map(|l| format!("&logo={l}&logoColor={}", tech.logo_color))
                .unwrap_or_default();
            doc.line(format!(
                r#"  <img src="{BADGE_BASE}/{}-{}?style=flat-square{logo}" alt="{}">"#,
                badge_escape(&tech.name),
                tech.color,
                tech.name
            ));
        }
        doc.line("</p>");
        doc.blank();
    }
}

fn contributors(doc: &mut Document, data: &ProfileData) {
    if data.contributors.is_empty() {
        return;
    }
    doc.line("### 🏆 Top contributors");
    doc.blank();
    doc.line("| | Contributor | Lines changed | |");
    doc.line("|---|---|---:|---|");
    let max = data.contributors.max();
    for (login, lines) in data.contributors.iter() {
        doc.line(format!(
            r#"| <a href="https://github.com/{login}"><img src="https://github.com/{login}.png?size=40" width="40" height="40" alt="{login}"></a> | [@{login}](https://github.com/{login}) | {} | `{}` |"#,
            format_thousands(*lines),
            bar(*lines, max, BAR_WIDTH)
        ));
    }
    doc.blank();
}

fn projects(doc: &mut Document, data: &ProfileData, config: &ProfileConfig) {
    if config.projects.is_empty() {
        return;
    }
    let org = data.org.to_lowercase();
    doc.line("### 🏗️ Projects");
    doc.blank();
    doc.line("| Project | Stack | Description |");
    doc.line("|---------|-------|-------------|");
    for project in &config.projects {
        let prefix = if project.emoji.is_empty() {
            String::new()
        } else {
            format!("{} ", project.emoji)
        };
        let mut cell = match &project.repo {
            Some(repo) => format!(
                "{prefix}[**{}**](https://github.com/{org}/{repo})",
                project.name
            ),
            None => format!("{prefix}**{}**", project.name),
        };
        if !project.links.is_empty() {
            let links: Vec<String> = project
                .links
                .iter()
                .map(|l| format!("[{}](https://github.com/{org}/{})", l.label, l.repo))
                .collect();
            cell.push_str(" · ");
            cell.push_str(&links.join(" · "));
        }
        doc.line(format!("| {cell} | {} | {} |", project.stack, project.description));
    }
    doc.blank();
}

fn team(doc: &mut Document, members: &[String]) {
    if members.is_empty() {
        return;
    }
    doc.line("### 👥 Team");
    doc.blank();
    doc.line("<table>");
    doc.line("  <tr>");
    for m in members {
        doc.line(r#"    <td align="center" width="100">"#);
        doc.line(format!(r#"      <a href="https://github.com/{m}">"#));
        doc.line(format!(
            r#"        <img src="https://github.com/{m}.png?size=64" width="64" height="64" alt="{m}">"#
        ));
        doc.line("      </a><br>");
        doc.line(format!(r#"      <a href="https://github.com/{m}">{m}</a>"#));
        doc.line("    </td>");
    }
    doc.line("  </tr>");
    doc.line("</table>");
    doc.blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Badge, Project, ProjectLink};
    use crate::model::SCHEMA_VERSION;
    use crate::stats::{HourlyHistogram, Ledger};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample() -> ProfileData {
        let mut contributors = Ledger::new();
        contributors.add("alice", 1200u64);
        contributors.add("bob", 30u64);
        let mut hours = HourlyHistogram::default();
        hours.add(3, 6);
        hours.add(14, 2);
        let mut languages = Ledger::new();
        languages.add("Rust", 5000u64);
        let mut loc = Ledger::new();
        loc.add(
            "Rust",
            LocCounts {
                files: 12,
                code: 1500,
                comments: 40,
                blanks: 100,
            },
        );
        loc.add(
            "Markdown",
            LocCounts {
                files: 2,
                code: 80,
                comments: 0,
                blanks: 10,
            },
        );
        ProfileData {
            version: SCHEMA_VERSION,
            generated_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
            org: "Acme".to_string(),
            total_repos: 7,
            public_repos: 4,
            unavailable: vec!["stuck".to_string()],
            contributors,
            utc_offset: 9,
            hours,
            languages,
            loc,
            members: vec!["alice".to_string(), "bob".to_string()],
        }
    }

    #[test]
    fn repository_badge_counts_every_repository() {
        let doc = render(&sample(), &ProfileConfig::default());
        assert!(doc.contains("badge/repos-7-blue"));
        assert!(doc.contains("badge/team-2-green"));
    }

    #[test]
    fn loc_badge_excludes_non_programming_languages() {
        let doc = render(&sample(), &ProfileConfig::default());
        assert!(doc.contains("badge/lines%20of%20code-1%2C500-orange"));
        assert!(doc.contains("| Rust | 12 | 1,500 | 40 | 100 |"));
        assert!(!doc.contains("| Markdown |"));
        assert!(doc.contains("| **Total** | **12** | **1,500** | **40** | **100** |"));
    }

    #[test]
    fn hour_chart_and_periods() {
        let config = ProfileConfig {
            annotate_hour: Some(3),
            annotation: "<-- 3:30 AM".to_string(),
            ..Default::default()
        };
        let doc = render(&sample(), &config);
        assert!(doc.contains(&format!("  3 AM  {}  6  <-- 3:30 AM", "█".repeat(20))));
        assert!(doc.contains(&format!("  2 PM  {}  2\n", "█".repeat(7) + &"░".repeat(13))));
        assert!(doc.contains(&format!(" 12 AM  ·{}  0\n", " ".repeat(19))));
        assert!(doc.contains("| 🌙 Night | 12–5 AM | 6 | 75% |"));
        assert!(doc.contains("| 🌤️ Afternoon | 12–5 PM | 2 | 25% |"));
        assert!(doc.contains("> **75%** of all commits land between midnight and 5 AM."));
        assert!(doc.contains("(UTC+9)"));
    }

    #[test]
    fn chart_is_labelled_with_the_offset_it_was_bucketed_with() {
        let config = ProfileConfig {
            utc_offset: 0,
            timezone_label: Some("GMT".to_string()),
            ..Default::default()
        };
        let doc = render(&sample(), &config);
        assert!(doc.contains("Commit activity across all repositories (UTC+9):"));
        assert!(!doc.contains("GMT"));

        let mut data = sample();
        data.utc_offset = 0;
        assert!(render(&data, &config).contains("Commit activity across all repositories (GMT):"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut data = sample();
        data.contributors = Ledger::new();
        data.loc = Ledger::new();
        data.languages = Ledger::new();
        data.hours = HourlyHistogram::default();
        let doc = render(&data, &ProfileConfig::default());
        assert!(!doc.contains("Top contributors"));
        assert!(!doc.contains("Lines of code"));
        assert!(!doc.contains("lines%20of%20code"));
        assert!(!doc.contains("Tech stack"));
        assert!(doc.contains("| 🌙 Night | 12–5 AM | 0 | 0% |"));
    }

    #[test]
    fn contributor_rows_have_proportional_bars() {
        let doc = render(&sample(), &ProfileConfig::default());
        assert!(doc.contains(&format!("| 1,200 | `{}` |", "█".repeat(20))));
        assert!(doc.contains(&format!("| 30 | `█{}` |", "░".repeat(19))));
        let alice = doc.find("[@alice]").unwrap();
        let bob = doc.find("[@bob]").unwrap();
        assert!(alice < bob);
    }

    #[test]
    fn configured_sections() {
        let config = ProfileConfig {
            org: Some("Acme".to_string()),
            tagline: Some("We ship".to_string()),
            badges: vec![Badge {
                label: "founded".to_string(),
                message: "Feb 2026".to_string(),
                color: "purple".to_string(),
                alt: Some("Founded".to_string()),
            }],
            projects: vec![Project {
                emoji: "🧰".to_string(),
                name: "agt".to_string(),
                repo: Some("agt".to_string()),
                links: vec![ProjectLink {
                    label: "web".to_string(),
                    repo: "agt-web".to_string(),
                }],
                stack: String::new(),
                description: "Toolkit".to_string(),
            }],
            ..Default::default()
        };
        let doc = render(&sample(), &config);
        assert!(doc.starts_with("<h1 align=\"center\">Acme</h1>\n"));
        assert!(doc.contains("<strong>We ship</strong>"));
        assert!(doc.contains(
            r#"badge/founded-Feb%202026-purple?style=flat-square" alt="Founded""#
        ));
        assert!(doc.contains(
            "| 🧰 [**agt**](https://github.com/acme/agt) · [web](https://github.com/acme/agt-web) |  | Toolkit |"
        ));
        assert!(doc.contains(
            r#"<a href="https://github.com/orgs/acme/repositories">Repositories</a>"#
        ));
    }

    #[test]
    fn rendering_is_byte_identical_across_runs() {
        let data = sample();
        let config = ProfileConfig::default();
        let first = render(&data, &config);
        let json = serde_json::to_string(&data).unwrap();
        let reloaded: ProfileData = serde_json::from_str(&json).unwrap();
        assert_eq!(render(&reloaded, &config), first);
        assert!(first.ends_with("</table>\n"));
    }

    #[test]
    fn badge_text_is_escaped() {
        assert_eq!(badge_escape("code by-AI agents_only"), "code%20by--AI%20agents__only");
    }
}
