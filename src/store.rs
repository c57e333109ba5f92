// 🔌 Collaborators - Everything the spot check talks to
//
// The core never owns storage, fetching or dispatch. Each concern is a trait;
// `db`, `inbox`, `scrape` and `report` hold the shipped implementations.

use anyhow::Result;

use crate::entities::{BaseBillId, Bill, BillTextReference, SpotCheckObservation};
use crate::parser::ScrapedDocument;

/// Scraped pages waiting to be ingested
pub trait DocumentInbox {
    /// Every pending document, in a stable order
    fn pending(&self) -> Result<Vec<ScrapedDocument>>;

    /// Move a processed document out of the pending set
    fn archive(&self, document: &ScrapedDocument) -> Result<()>;
}

/// Persistence for bill text references
pub trait ReferenceStore {
    /// Insert or replace, keyed by (bill, version, scrape time)
    fn upsert(&self, reference: &BillTextReference) -> Result<()>;

    /// Most recently scraped reference for a bill
    fn latest_reference(&self, bill_id: &BaseBillId) -> Result<Option<BillTextReference>>;

    /// Every bill that has at least one reference
    fn referenced_bills(&self) -> Result<Vec<BaseBillId>>;
}

/// Read access to the primary bill data
pub trait BillRepository {
    fn get_bill(&self, bill_id: &BaseBillId) -> Result<Option<Bill>>;
}

/// Fetches new pages into the inbox
pub trait BillScraper {
    /// Number of newly fetched documents
    fn scrape(&self) -> Result<usize>;
}

/// Receives finished observations
pub trait Reporter {
    fn report(&mut self, observations: &[SpotCheckObservation]) -> Result<()>;
}
