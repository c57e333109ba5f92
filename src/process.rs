// 🔁 Spot Check Process - Collate, ingest, compare
//
// Pipeline:
//   1. collate  - scraper drops new pages into the inbox
//   2. ingest   - parse every pending page, persist references, archive pages
//   3. compare  - latest reference vs stored bill, observations to the reporter
//
// Ingest is all-or-nothing per batch: nothing is persisted or archived until
// every pending page has parsed.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::check::BillTextCheckService;
use crate::entities::{BaseBillId, SpotCheckObservation};
use crate::error::SpotCheckError;
use crate::parser::ScrapedBillTextParser;
use crate::store::{BillRepository, BillScraper, DocumentInbox, ReferenceStore, Reporter};

pub struct SpotcheckProcess<'a> {
    scraper: &'a dyn BillScraper,
    inbox: &'a dyn DocumentInbox,
    references: &'a dyn ReferenceStore,
    bills: &'a dyn BillRepository,
    reporter: &'a mut dyn Reporter,
    parser: ScrapedBillTextParser,
    checker: BillTextCheckService,
}

impl<'a> SpotcheckProcess<'a> {
    pub fn new(
        scraper: &'a dyn BillScraper,
        inbox: &'a dyn DocumentInbox,
        references: &'a dyn ReferenceStore,
        bills: &'a dyn BillRepository,
        reporter: &'a mut dyn Reporter,
    ) -> Result<Self> {
        Ok(SpotcheckProcess {
            scraper,
            inbox,
            references,
            bills,
            reporter,
            parser: ScrapedBillTextParser::new()?,
            checker: BillTextCheckService::new()?,
        })
    }

    /// Swap in a check service with a different memo policy
    pub fn with_checker(mut self, checker: BillTextCheckService) -> Self {
        self.checker = checker;
        self
    }

    pub fn collate_type(&self) -> &'static str {
        "Scraped Bill"
    }

    pub fn ingest_type(&self) -> &'static str {
        "Bill Text spotcheck reference"
    }

    /// Fetch new pages into the inbox
    pub fn collate(&self) -> Result<usize> {
        let fetched = self.scraper.scrape().context("Scraper failed")?;
        info!("Collated {} {} documents", fetched, self.collate_type());
        Ok(fetched)
    }

    /// Turn every pending page into a stored reference
    pub fn ingest(&self) -> Result<usize> {
        let pending = self.inbox.pending()?;
        if pending.is_empty() {
            info!("No pending documents to ingest");
            return Ok(0);
        }

        // Parse everything first
        let mut references = Vec::with_capacity(pending.len());
        for document in &pending {
            let reference = self
                .parser
                .parse_reference(document)
                .with_context(|| format!("Failed to parse {}", document.name))?;
            references.push(reference);
        }

        for reference in &references {
            self.references.upsert(reference)?;
        }

        for document in &pending {
            self.inbox.archive(document)?;
        }

        info!("Ingested {} {}s", references.len(), self.ingest_type());
        Ok(references.len())
    }

    /// Check each requested bill against its most recent reference
    ///
    /// A bill without any reference is an error. A bill the repository has
    /// never heard of is skipped with a warning.
    pub fn compare(&mut self, bill_ids: &[BaseBillId]) -> Result<Vec<SpotCheckObservation>> {
        let mut observations = Vec::new();

        for bill_id in bill_ids {
            let reference = self
                .references
                .latest_reference(bill_id)?
                .ok_or_else(|| SpotCheckError::MissingReference(bill_id.to_string()))?;

            let Some(bill) = self.bills.get_bill(bill_id)? else {
                warn!("Skipping {}: bill not found in repository", bill_id);
                continue;
            };

            observations.push(self.checker.check(&bill, &reference));
        }

        let with_mismatches = observations.iter().filter(|o| o.has_mismatches()).count();
        info!(
            "Compared {} bills, {} with mismatches",
            observations.len(),
            with_mismatches
        );

        self.reporter.report(&observations)?;
        Ok(observations)
    }

    /// Compare every bill that has a reference
    pub fn compare_all(&mut self) -> Result<Vec<SpotCheckObservation>> {
        let bill_ids = self.references.referenced_bills()?;
        self.compare(&bill_ids)
    }
}

// ============================================================================
// TESTS
// ============================================================================
