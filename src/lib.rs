// Bill Text Spot Check - Core Library
// Scraped LBDC bill pages vs stored bill text, exposed for the CLI and tests

pub mod entities;
pub mod error;
pub mod text;        // HTML fragment → plain text
pub mod formatting;  // Header and resolution rewrite rules
pub mod parser;      // Scraped page → BillTextReference
pub mod normalization;
pub mod check;       // Tiered text, amendment and memo comparison
pub mod store;       // Collaborator traits
pub mod db;
pub mod inbox;
pub mod scrape;
pub mod report;
pub mod process;
pub mod config;

// Re-export commonly used types
pub use entities::{
    BaseBillId, Bill, BillAmendment, BillId, BillTextReference, BillType, Chamber,
    MismatchType, SpotCheckMismatch, SpotCheckObservation, SpotCheckRefType,
    SpotCheckReferenceId, Version,
};
pub use error::SpotCheckError;
pub use text::{reconstruct_blocks, reconstruct_text};
pub use formatting::FormattingNormalizer;
pub use parser::{ScrapedBillTextParser, ScrapedDocument, ScrapedFileName};
pub use normalization::{TextNormalizer, TextTiers};
pub use check::{senate_bills_only, BillTextCheckService, MemoPolicy};
pub use store::{BillRepository, BillScraper, DocumentInbox, ReferenceStore, Reporter};
pub use db::{setup_database, SqliteStore};
pub use inbox::FsInbox;
pub use scrape::DirectoryScraper;
pub use report::{CsvReporter, JsonReporter};
pub use process::SpotcheckProcess;
pub use config::{ReportFormat, SpotcheckConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
