// 📥 Filesystem Inbox - Incoming and archived scraped pages
//
//   incoming/  pages waiting for ingest
//   archive/   pages already turned into references

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::parser::ScrapedDocument;
use crate::store::DocumentInbox;

pub struct FsInbox {
    incoming_dir: PathBuf,
    archive_dir: PathBuf,
}

impl FsInbox {
    pub fn new(incoming_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        FsInbox {
            incoming_dir: incoming_dir.into(),
            archive_dir: archive_dir.into(),
        }
    }

    /// Names of scraped pages in a directory, sorted
    pub fn html_file_names(dir: &Path) -> Result<Vec<String>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory: {}", dir.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.to_lowercase().ends_with(".html") {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

impl DocumentInbox for FsInbox {
    fn pending(&self) -> Result<Vec<ScrapedDocument>> {
        let mut documents = Vec::new();

        for name in Self::html_file_names(&self.incoming_dir)? {
            let path = self.incoming_dir.join(&name);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read scraped bill: {}", path.display()))?;
            documents.push(ScrapedDocument::new(name, content));
        }

        debug!(
            "Found {} pending documents in {}",
            documents.len(),
            self.incoming_dir.display()
        );
        Ok(documents)
    }

    fn archive(&self, document: &ScrapedDocument) -> Result<()> {
        fs::create_dir_all(&self.archive_dir).with_context(|| {
            format!("Failed to create archive dir: {}", self.archive_dir.display())
        })?;

        let from = self.incoming_dir.join(&document.name);
        let to = self.archive_dir.join(&document.name);
        fs::rename(&from, &to).with_context(|| {
            format!("Failed to archive {} to {}", from.display(), to.display())
        })?;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_lists_html_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming");
        fs::create_dir_all(&incoming).unwrap();
        fs::write(incoming.join("2015-S2-20150310T000000.html"), "two").unwrap();
        fs::write(incoming.join("2015-S1-20150310T000000.html"), "one").unwrap();
        fs::write(incoming.join("notes.txt"), "skip").unwrap();

        let inbox = FsInbox::new(&incoming, dir.path().join("archive"));
        let pending = inbox.pending().unwrap();

        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].name, "2015-S1-20150310T000000.html");
        assert_eq!(pending[0].content, "one");
        assert_eq!(pending[1].content, "two");
    }

    #[test]
    fn test_archive_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming");
        let archive = dir.path().join("archive");
        fs::create_dir_all(&incoming).unwrap();
        fs::write(incoming.join("2015-S1-20150310T000000.html"), "one").unwrap();

        let inbox = FsInbox::new(&incoming, &archive);
        let document = inbox.pending().unwrap().remove(0);
        inbox.archive(&document).unwrap();

        assert!(inbox.pending().unwrap().is_empty());
        assert!(archive.join("2015-S1-20150310T000000.html").exists());

        println!("✅ Archive test passed");
    }

    #[test]
    fn test_missing_incoming_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let inbox = FsInbox::new(dir.path().join("nope"), dir.path().join("archive"));

        assert!(inbox.pending().unwrap().is_empty());
    }
}
