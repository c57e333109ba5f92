// ⚖️ Bill Text Check Service - Stored bill vs scraped reference
//
// Checks, in order:
//   1. active amendment  - always
//   2. full text         - when the bill has the reference's amendment
//   3. sponsor memo      - same, and only for bills the memo policy selects
//
// A text mismatch is DECIDED on tier2 (super-normalized, case-insensitive) but
// REPORTED at all four tiers so a reviewer can see where the texts drift apart.

use tracing::debug;

use crate::entities::{
    BaseBillId, Bill, BillAmendment, BillTextReference, Chamber, MismatchType,
    SpotCheckMismatch, SpotCheckObservation,
};
use crate::error::SpotCheckError;
use crate::normalization::TextNormalizer;

/// Decides which bills get their sponsor memo compared
pub type MemoPolicy = Box<dyn Fn(&BaseBillId) -> bool + Send + Sync>;

/// Default memo policy: Senate bills, never resolutions
pub fn senate_bills_only(bill_id: &BaseBillId) -> bool {
    bill_id.chamber() == Chamber::Senate && !bill_id.bill_type.is_resolution()
}

// ============================================================================
// CHECK SERVICE
// ============================================================================

pub struct BillTextCheckService {
    normalizer: TextNormalizer,
    memo_policy: MemoPolicy,
}

impl BillTextCheckService {
    pub fn new() -> Result<Self, SpotCheckError> {
        Self::with_memo_policy(Box::new(senate_bills_only))
    }

    pub fn with_memo_policy(memo_policy: MemoPolicy) -> Result<Self, SpotCheckError> {
        Ok(BillTextCheckService {
            normalizer: TextNormalizer::new()?,
            memo_policy,
        })
    }

    /// Check a stored bill against a reference
    ///
    /// Example:
    /// ```ignore
    /// let checker = BillTextCheckService::new()?;
    /// let observation = checker.check(&bill, &reference);
    /// for mismatch in observation.mismatches() {
    ///     println!("{}", mismatch.mismatch_type);
    /// }
    /// ```
    pub fn check(&self, bill: &Bill, reference: &BillTextReference) -> SpotCheckObservation {
        let mut observation =
            SpotCheckObservation::new(reference.reference_id(), bill.base_bill_id.clone());

        self.check_active_amendment(bill, reference, &mut observation);

        if let Some(amendment) = bill.amendment(reference.active_version()) {
            self.check_bill_text(amendment, reference, &mut observation);
            if (self.memo_policy)(&bill.base_bill_id) {
                self.check_memo(amendment, reference, &mut observation);
            }
        }

        debug!("{}", observation.summary());
        observation
    }

    fn check_active_amendment(
        &self,
        bill: &Bill,
        reference: &BillTextReference,
        observation: &mut SpotCheckObservation,
    ) {
        if bill.active_version != Some(reference.active_version()) {
            observation.add_mismatch(SpotCheckMismatch::new(
                MismatchType::BillActiveAmendment,
                reference.active_version().to_string(),
                bill.active_version_label(),
            ));
        }
    }

    fn check_bill_text(
        &self,
        amendment: &BillAmendment,
        reference: &BillTextReference,
        observation: &mut SpotCheckObservation,
    ) {
        let ref_tiers = self.normalizer.tiers(reference.text(), reference.bill_id());
        let data_tiers = self.normalizer.tiers(&amendment.full_text, reference.bill_id());

        if ref_tiers
            .super_normalized
            .eq_ignore_ascii_case(&data_tiers.super_normalized)
        {
            return;
        }

        let tiers = [
            (MismatchType::BillFullText, ref_tiers.raw, data_tiers.raw),
            (
                MismatchType::BillFullTextNormalized,
                ref_tiers.normalized,
                data_tiers.normalized,
            ),
            (
                MismatchType::BillFullTextSuperNormalized,
                ref_tiers.super_normalized,
                data_tiers.super_normalized,
            ),
            (
                MismatchType::BillFullTextUltraNormalized,
                ref_tiers.ultra_normalized,
                data_tiers.ultra_normalized,
            ),
        ];

        for (mismatch_type, reference_data, observed_data) in tiers {
            observation.add_mismatch(SpotCheckMismatch::new(
                mismatch_type,
                reference_data,
                observed_data,
            ));
        }
    }

    fn check_memo(
        &self,
        amendment: &BillAmendment,
        reference: &BillTextReference,
        observation: &mut SpotCheckObservation,
    ) {
        if amendment.memo.to_lowercase() != reference.memo().to_lowercase() {
            observation.add_mismatch(SpotCheckMismatch::new(
                MismatchType::BillMemo,
                reference.memo().to_string(),
                amendment.memo.clone(),
            ));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BillType, Version};
    use chrono::NaiveDate;

    fn create_test_bill(bill_type: BillType, active: Version, text: &str, memo: &str) -> Bill {
        let mut bill = Bill::new(BaseBillId::new(bill_type, 1234, 2015));
        bill.add_amendment(active, text, memo);
        bill.active_version = Some(active);
        bill
    }

    fn create_test_reference(
        bill_type: BillType,
        version: Version,
        text: &str,
        memo: &str,
    ) -> BillTextReference {
        BillTextReference::new(
            BaseBillId::new(bill_type, 1234, 2015).with_version(version),
            NaiveDate::from_ymd_opt(2015, 3, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            text.to_string(),
            memo.to_string(),
        )
    }

    #[test]
    fn test_identical_bill_has_no_mismatches() {
        let checker = BillTextCheckService::new().unwrap();
        let bill = create_test_bill(BillType::S, Version::Base, "Section 1. Law.", "memo");
        let reference = create_test_reference(BillType::S, Version::Base, "Section 1. Law.", "memo");

        let observation = checker.check(&bill, &reference);

        assert!(!observation.has_mismatches());
        assert_eq!(observation.key, bill.base_bill_id);
        println!("✅ Test passed: {}", observation.summary());
    }

    #[test]
    fn test_spacing_and_case_differences_are_not_mismatches() {
        let checker = BillTextCheckService::new().unwrap();
        let bill = create_test_bill(BillType::S, Version::Base, "Section  1.\n   the LAW", "");
        let reference = create_test_reference(BillType::S, Version::Base, "SECTION 1. The law", "");

        let observation = checker.check(&bill, &reference);

        assert!(!observation.has_mismatch(MismatchType::BillFullText));
        assert!(!observation.has_mismatches());
    }

    #[test]
    fn test_text_mismatch_reported_at_all_tiers() {
        let checker = BillTextCheckService::new().unwrap();
        let bill = create_test_bill(BillType::A, Version::Base, "Section 1.  Old   law", "");
        let reference = create_test_reference(BillType::A, Version::Base, "Section 1. New law", "");

        let observation = checker.check(&bill, &reference);
        let kinds: Vec<MismatchType> = observation
            .mismatches()
            .iter()
            .map(|m| m.mismatch_type)
            .collect();

        assert_eq!(
            kinds,
            vec![
                MismatchType::BillFullText,
                MismatchType::BillFullTextNormalized,
                MismatchType::BillFullTextSuperNormalized,
                MismatchType::BillFullTextUltraNormalized,
            ]
        );

        let raw = &observation.mismatches()[0];
        assert_eq!(raw.reference_data, "Section 1. New law");
        assert_eq!(raw.observed_data, "Section 1.  Old   law");

        let normalized = &observation.mismatches()[1];
        assert_eq!(normalized.observed_data, "Section 1. Old law");

        let super_normalized = &observation.mismatches()[2];
        assert_eq!(super_normalized.reference_data, "Section1Newlaw");
        assert_eq!(super_normalized.observed_data, "Section1Oldlaw");

        println!("✅ Tiered text mismatch test passed");
    }

    #[test]
    fn test_active_amendment_mismatch() {
        let checker = BillTextCheckService::new().unwrap();
        let mut bill = create_test_bill(BillType::S, Version::Base, "text", "memo");
        bill.add_amendment(Version::Amendment('A'), "text", "memo");
        let reference = create_test_reference(BillType::S, Version::Amendment('A'), "text", "memo");

        let observation = checker.check(&bill, &reference);

        assert_eq!(observation.mismatches().len(), 1);
        let mismatch = &observation.mismatches()[0];
        assert_eq!(mismatch.mismatch_type, MismatchType::BillActiveAmendment);
        assert_eq!(mismatch.reference_data, "A");
        assert_eq!(mismatch.observed_data, "DEFAULT");
    }

    #[test]
    fn test_missing_amendment_only_checks_active_version() {
        let checker = BillTextCheckService::new().unwrap();
        let bill = create_test_bill(BillType::S, Version::Base, "text", "memo");
        let reference =
            create_test_reference(BillType::S, Version::Amendment('B'), "other text", "other memo");

        let observation = checker.check(&bill, &reference);

        assert_eq!(observation.mismatches().len(), 1);
        assert!(observation.has_mismatch(MismatchType::BillActiveAmendment));
    }

    #[test]
    fn test_unset_active_version_is_a_mismatch() {
        let checker = BillTextCheckService::new().unwrap();
        let mut bill = create_test_bill(BillType::S, Version::Base, "text", "memo");
        bill.active_version = None;
        let reference = create_test_reference(BillType::S, Version::Base, "text", "memo");

        let observation = checker.check(&bill, &reference);

        assert_eq!(observation.mismatches().len(), 1);
        assert_eq!(observation.mismatches()[0].observed_data, "");
    }

    #[test]
    fn test_memo_checked_for_senate_bills_only() {
        let checker = BillTextCheckService::new().unwrap();

        let senate = create_test_bill(BillType::S, Version::Base, "text", "Stored memo");
        let senate_ref = create_test_reference(BillType::S, Version::Base, "text", "Scraped memo");
        let observation = checker.check(&senate, &senate_ref);
        assert_eq!(observation.mismatches().len(), 1);
        assert_eq!(observation.mismatches()[0].mismatch_type, MismatchType::BillMemo);
        assert_eq!(observation.mismatches()[0].reference_data, "Scraped memo");

        let assembly = create_test_bill(BillType::A, Version::Base, "text", "Stored memo");
        let assembly_ref = create_test_reference(BillType::A, Version::Base, "text", "Scraped memo");
        assert!(!checker.check(&assembly, &assembly_ref).has_mismatches());

        let resolution = create_test_bill(BillType::J, Version::Base, "text", "Stored memo");
        let resolution_ref = create_test_reference(BillType::J, Version::Base, "text", "");
        assert!(!checker.check(&resolution, &resolution_ref).has_mismatches());
    }

    #[test]
    fn test_memo_comparison_ignores_case() {
        let checker = BillTextCheckService::new().unwrap();
        let bill = create_test_bill(BillType::S, Version::Base, "text", "PURPOSE: Ünder law");
        let reference = create_test_reference(BillType::S, Version::Base, "text", "purpose: ünder LAW");

        assert!(!checker.check(&bill, &reference).has_mismatches());
    }

    #[test]
    fn test_custom_memo_policy() {
        let checker =
            BillTextCheckService::with_memo_policy(Box::new(|id: &BaseBillId| {
                id.chamber() == Chamber::Assembly
            }))
                .unwrap();

        let assembly = create_test_bill(BillType::A, Version::Base, "text", "Stored memo");
        let assembly_ref = create_test_reference(BillType::A, Version::Base, "text", "Scraped memo");
        assert!(checker
            .check(&assembly, &assembly_ref)
            .has_mismatch(MismatchType::BillMemo));

        let senate = create_test_bill(BillType::S, Version::Base, "text", "Stored memo");
        let senate_ref = create_test_reference(BillType::S, Version::Base, "text", "Scraped memo");
        assert!(!checker.check(&senate, &senate_ref).has_mismatches());
    }
}
