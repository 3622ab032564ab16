//! `quire feed`: render the Atom feed once and print it.

use std::io::{self, Write};

use anyhow::{Result, bail};

use crate::config::SiteConfig;
use crate::site::{FeedStatus, Site};

/// Write the minified feed to stdout.
pub fn print_feed(config: &SiteConfig) -> Result<()> {
    let bytes = render_feed(config)?;
    let mut out = io::stdout().lock();
    out.write_all(&bytes)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn render_feed(config: &SiteConfig) -> Result<Vec<u8>> {
    let site = Site::from_config(config)?;
    let report = site.refresh();
    if report.feed == FeedStatus::Stale {
        bail!("feed template failed to render");
    }

    let feed = site.feed();
    if feed.is_empty() {
        bail!("feed template produced no output");
    }
    Ok(feed.bytes.clone())
}
