// 🕸️ Directory Scraper - Collect dropped pages into the inbox
//
// The fetcher itself runs outside this crate and drops pages into a source
// directory. Collating copies every page that follows the filename contract
// and has not been seen before (neither pending nor archived).

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::inbox::FsInbox;
use crate::parser::scraped_file_name_pattern;
use crate::store::BillScraper;

pub struct DirectoryScraper {
    source_dir: PathBuf,
    incoming_dir: PathBuf,
    archive_dir: PathBuf,
    file_name_pattern: Regex,
}

impl DirectoryScraper {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        incoming_dir: impl Into<PathBuf>,
        archive_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(DirectoryScraper {
            source_dir: source_dir.into(),
            incoming_dir: incoming_dir.into(),
            archive_dir: archive_dir.into(),
            file_name_pattern: scraped_file_name_pattern()?,
        })
    }
}

impl BillScraper for DirectoryScraper {
    fn scrape(&self) -> Result<usize> {
        let mut known = FsInbox::html_file_names(&self.incoming_dir)?;
        known.extend(FsInbox::html_file_names(&self.archive_dir)?);

        fs::create_dir_all(&self.incoming_dir).with_context(|| {
            format!("Failed to create incoming dir: {}", self.incoming_dir.display())
        })?;

        let mut fetched = 0;
        for name in FsInbox::html_file_names(&self.source_dir)? {
            if !self.file_name_pattern.is_match(&name) {
                debug!("Skipping {}: not a scraped bill page", name);
                continue;
            }
            if known.contains(&name) {
                continue;
            }

            let from = self.source_dir.join(&name);
            let to = self.incoming_dir.join(&name);
            fs::copy(&from, &to)
                .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
            fetched += 1;
        }

        info!("Fetched {} new scraped bills from {}", fetched, self.source_dir.display());
        Ok(fetched)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_copies_new_pages_once() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let incoming = dir.path().join("incoming");
        let archive = dir.path().join("archive");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&archive).unwrap();

        fs::write(source.join("2015-S1-20150310T000000.html"), "one").unwrap();
        fs::write(source.join("2015-S2-20150310T000000.html"), "two").unwrap();
        fs::write(source.join("index.html"), "not a bill").unwrap();
        fs::write(archive.join("2015-S2-20150310T000000.html"), "two").unwrap();

        let scraper = DirectoryScraper::new(&source, &incoming, &archive).unwrap();

        assert_eq!(scraper.scrape().unwrap(), 1);
        assert!(incoming.join("2015-S1-20150310T000000.html").exists());
        assert!(!incoming.join("index.html").exists());

        // second run finds nothing new
        assert_eq!(scraper.scrape().unwrap(), 0);

        println!("✅ Directory scraper test passed");
    }
}
