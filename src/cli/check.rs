//! `quire check`: parse every post once and report what was skipped.

use std::io::{self, Write};

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::post::PostLayout;
use crate::store::{ScanReport, SkippedSummary, scan_posts};
use crate::utils::date;

#[derive(Debug, Serialize)]
struct AcceptedSummary<'a> {
    id: &'a str,
    title: &'a str,
    datetime: String,
}

#[derive(Debug, Serialize)]
struct CheckSummary<'a> {
    posts: Vec<AcceptedSummary<'a>>,
    skipped: Vec<SkippedSummary>,
}

impl<'a> From<&'a ScanReport> for CheckSummary<'a> {
    fn from(report: &'a ScanReport) -> Self {
        Self {
            posts: report
                .posts
                .iter()
                .map(|p| AcceptedSummary {
                    id: &p.id,
                    title: &p.title,
                    datetime: date::to_rfc3339(p.datetime),
                })
                .collect(),
            skipped: report.skipped.iter().map(SkippedSummary::from).collect(),
        }
    }
}

/// Scan the posts directory. Fails if any file was skipped.
pub fn check_posts(config: &SiteConfig, json: bool) -> Result<()> {
    let report = scan_posts(&PostLayout::from_config(config));

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &CheckSummary::from(&report))?;
        writeln!(out)?;
    } else {
        write_text(&mut out, &report)?;
    }
    out.flush()?;

    if !report.is_clean() {
        bail!(
            "{} of {} post files skipped",
            report.skipped.len(),
            report.skipped.len() + report.posts.len()
        );
    }
    Ok(())
}

fn write_text(out: &mut impl Write, report: &ScanReport) -> io::Result<()> {
    for post in &report.posts {
        writeln!(
            out,
            "{} {} {}",
            "ok".green().bold(),
            post.id,
            date::to_rfc3339(post.datetime).dimmed()
        )?;
    }
    for item in &report.skipped {
        writeln!(
            out,
            "{} {}: {}",
            "skip".red().bold(),
            item.path.display(),
            item.reason()
        )?;
    }
    Ok(())
}
