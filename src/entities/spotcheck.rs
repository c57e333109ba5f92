// 🔎 Spot Check Entities - References, mismatches and observations
//
// A reference is the scraped ground truth for one bill at one point in time.
// An observation is the outcome of checking a stored bill against it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bill::{BaseBillId, BillId, Version};

// ============================================================================
// REFERENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotCheckRefType {
    /// Bill pages scraped from the LBDC public site
    LbdcScrapedBill,
}

impl SpotCheckRefType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotCheckRefType::LbdcScrapedBill => "LBDC_SCRAPED_BILL",
        }
    }
}

impl fmt::Display for SpotCheckRefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which reference an observation was checked against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotCheckReferenceId {
    pub ref_type: SpotCheckRefType,
    pub ref_active_date_time: NaiveDateTime,
}

/// Scraped bill text, created once at ingest and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillTextReference {
    /// Carries the amendment that was active when the page was scraped
    bill_id: BillId,
    ref_date_time: NaiveDateTime,
    text: String,
    /// Empty for resolutions
    memo: String,
}

impl BillTextReference {
    pub fn new(bill_id: BillId, ref_date_time: NaiveDateTime, text: String, memo: String) -> Self {
        BillTextReference {
            bill_id,
            ref_date_time,
            text,
            memo,
        }
    }

    pub fn bill_id(&self) -> &BillId {
        &self.bill_id
    }

    pub fn base_bill_id(&self) -> &BaseBillId {
        &self.bill_id.base
    }

    pub fn active_version(&self) -> Version {
        self.bill_id.version
    }

    pub fn ref_date_time(&self) -> NaiveDateTime {
        self.ref_date_time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn reference_id(&self) -> SpotCheckReferenceId {
        SpotCheckReferenceId {
            ref_type: SpotCheckRefType::LbdcScrapedBill,
            ref_active_date_time: self.ref_date_time,
        }
    }
}

// ============================================================================
// MISMATCHES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MismatchType {
    BillActiveAmendment,
    BillFullText,
    BillFullTextNormalized,
    BillFullTextSuperNormalized,
    BillFullTextUltraNormalized,
    BillMemo,
}

impl MismatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchType::BillActiveAmendment => "BILL_ACTIVE_AMENDMENT",
            MismatchType::BillFullText => "BILL_FULL_TEXT",
            MismatchType::BillFullTextNormalized => "BILL_FULL_TEXT_NORMALIZED",
            MismatchType::BillFullTextSuperNormalized => "BILL_FULL_TEXT_SUPER_NORMALIZED",
            MismatchType::BillFullTextUltraNormalized => "BILL_FULL_TEXT_ULTRA_NORMALIZED",
            MismatchType::BillMemo => "BILL_MEMO",
        }
    }
}

impl fmt::Display for MismatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-value mismatch; values are stored verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotCheckMismatch {
    pub mismatch_type: MismatchType,
    pub reference_data: String,
    pub observed_data: String,
}

impl SpotCheckMismatch {
    pub fn new(mismatch_type: MismatchType, reference_data: String, observed_data: String) -> Self {
        SpotCheckMismatch {
            mismatch_type,
            reference_data,
            observed_data,
        }
    }
}

// ============================================================================
// OBSERVATION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotCheckObservation {
    pub reference_id: SpotCheckReferenceId,
    pub key: BaseBillId,
    pub observed_at: DateTime<Utc>,
    mismatches: Vec<SpotCheckMismatch>,
}

impl SpotCheckObservation {
    pub fn new(reference_id: SpotCheckReferenceId, key: BaseBillId) -> Self {
        SpotCheckObservation {
            reference_id,
            key,
            observed_at: Utc::now(),
            mismatches: Vec::new(),
        }
    }

    /// Mismatches are append-only
    pub fn add_mismatch(&mut self, mismatch: SpotCheckMismatch) {
        self.mismatches.push(mismatch);
    }

    pub fn mismatches(&self) -> &[SpotCheckMismatch] {
        &self.mismatches
    }

    pub fn has_mismatches(&self) -> bool {
        !self.mismatches.is_empty()
    }

    pub fn has_mismatch(&self, mismatch_type: MismatchType) -> bool {
        self.mismatches
            .iter()
            .any(|m| m.mismatch_type == mismatch_type)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} vs {} @ {}: {} mismatches",
            self.key,
            self.reference_id.ref_type,
            self.reference_id.ref_active_date_time,
            self.mismatches.len()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::bill::BillType;
    use chrono::NaiveDate;

    fn reference_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 3, 10)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_reference_accessors() {
        let bill_id = BaseBillId::new(BillType::S, 42, 2015).with_version(Version::Amendment('B'));
        let reference = BillTextReference::new(
            bill_id.clone(),
            reference_time(),
            "text".to_string(),
            "memo".to_string(),
        );

        assert_eq!(reference.active_version(), Version::Amendment('B'));
        assert_eq!(reference.base_bill_id(), &bill_id.base);
        assert_eq!(reference.reference_id().ref_type, SpotCheckRefType::LbdcScrapedBill);
        assert_eq!(reference.reference_id().ref_active_date_time, reference_time());
    }

    #[test]
    fn test_observation_appends_mismatches() {
        let key = BaseBillId::new(BillType::A, 7, 2015);
        let reference_id = SpotCheckReferenceId {
            ref_type: SpotCheckRefType::LbdcScrapedBill,
            ref_active_date_time: reference_time(),
        };
        let mut observation = SpotCheckObservation::new(reference_id, key);
        assert!(!observation.has_mismatches());

        observation.add_mismatch(SpotCheckMismatch::new(
            MismatchType::BillMemo,
            "a".to_string(),
            "b".to_string(),
        ));
        observation.add_mismatch(SpotCheckMismatch::new(
            MismatchType::BillMemo,
            "a".to_string(),
            "b".to_string(),
        ));

        assert_eq!(observation.mismatches().len(), 2);
        assert!(observation.has_mismatch(MismatchType::BillMemo));
        assert!(!observation.has_mismatch(MismatchType::BillFullText));

        println!("✅ Observation test passed: {}", observation.summary());
    }

    #[test]
    fn test_mismatch_type_serializes_screaming_case() {
        let json = serde_json::to_string(&MismatchType::BillFullTextSuperNormalized).unwrap();
        assert_eq!(json, "\"BILL_FULL_TEXT_SUPER_NORMALIZED\"");
    }
}
