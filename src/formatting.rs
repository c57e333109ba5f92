// ✂️ Formatting Normalizer - Repair scraped bill text
//
// Rules as data: every repair is a named (pattern, replacement, scope) step,
// applied in list order. Three groups:
//   1. cleanup      (all bills)          - must run before indentation-sensitive rules
//   2. resolution   (J, B, R, E, C, K, L) - boilerplate header + resolution opening line
//   3. bill header  (S, A)               - letter-spaced title lines
//
// The `regex` crate has no look-around, so "preceded by newline" / "followed by
// newline" constraints are consumed by the pattern and written back by the
// replacement.

use regex::{Captures, NoExpand, Regex};

use crate::entities::BaseBillId;
use crate::error::SpotCheckError;

// ============================================================================
// REWRITE RULE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Replace the first match only
    First,
    /// Replace every non-overlapping match
    All,
}

#[derive(Clone)]
pub enum Replacement {
    /// Inserted as-is (no `$` expansion)
    Literal(String),
    /// Built from the match and the bill being formatted
    Computed(fn(&Captures<'_>, &BaseBillId) -> String),
}

#[derive(Clone)]
pub struct RewriteRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: Replacement,
    pub scope: Scope,
}

impl RewriteRule {
    pub fn literal(
        name: &'static str,
        pattern: &str,
        replacement: &str,
        scope: Scope,
    ) -> Result<Self, SpotCheckError> {
        Ok(RewriteRule {
            name,
            pattern: Regex::new(pattern)?,
            replacement: Replacement::Literal(replacement.to_string()),
            scope,
        })
    }

    pub fn computed(
        name: &'static str,
        pattern: &str,
        replacement: fn(&Captures<'_>, &BaseBillId) -> String,
        scope: Scope,
    ) -> Result<Self, SpotCheckError> {
        Ok(RewriteRule {
            name,
            pattern: Regex::new(pattern)?,
            replacement: Replacement::Computed(replacement),
            scope,
        })
    }

    /// Apply this rule once over `text`
    pub fn apply(&self, text: &str, bill_id: &BaseBillId) -> String {
        let limit = match self.scope {
            Scope::First => 1,
            Scope::All => 0,
        };

        match &self.replacement {
            Replacement::Literal(rep) => self
                .pattern
                .replacen(text, limit, NoExpand(rep.as_str()))
                .into_owned(),
            Replacement::Computed(build) => self
                .pattern
                .replacen(text, limit, |caps: &Captures<'_>| build(caps, bill_id))
                .into_owned(),
        }
    }
}

impl std::fmt::Debug for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Replacement::Literal(rep) => f.debug_tuple("Literal").field(rep).finish(),
            Replacement::Computed(_) => f.write_str("Computed"),
        }
    }
}

impl std::fmt::Debug for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("replacement", &self.replacement)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Run an ordered rule list over `text`
pub fn apply_rules(rules: &[RewriteRule], text: &str, bill_id: &BaseBillId) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc, bill_id))
}

// ============================================================================
// RULE SETS
// ============================================================================

fn spaced(columns: usize, text: &str) -> String {
    format!("{}{}", " ".repeat(columns), text)
}

fn legislative_resolution_start(caps: &Captures<'_>, _bill_id: &BaseBillId) -> String {
    let word = &caps[1];
    // chamber resolutions open with PROVIDING, left for the chamber rule
    if word == "PROVIDING" {
        return caps[0].to_string();
    }
    format!("\nLEGISLATIVE RESOLUTION {}", word.to_lowercase())
}

fn chamber_resolution_start(_caps: &Captures<'_>, bill_id: &BaseBillId) -> String {
    format!("\n{} RESOLUTION providing", bill_id.chamber())
}

/// Cleanup applied to every document
pub fn cleanup_rules() -> Result<Vec<RewriteRule>, SpotCheckError> {
    Ok(vec![
        // one-column shift every scraped <pre> line carries
        RewriteRule::literal("strip-line-shift", "\n ", "\n", Scope::All)?,
        RewriteRule::literal("strip-control", r"[\r\x{FEFF}-\x{FFFF}]", "", Scope::All)?,
        RewriteRule::literal("section-mark", "§", "S", Scope::All)?,
    ])
}

pub fn resolution_rules() -> Result<Vec<RewriteRule>, SpotCheckError> {
    Ok(vec![
        RewriteRule::literal(
            "resolution-header",
            r"^\n\n[0-9A-Za-z_ .\-]+\n\n[0-9A-Za-z_ ./:\-]+\n",
            "",
            Scope::First,
        )?,
        RewriteRule::computed(
            "legislative-resolution-start",
            r"^\n +([A-Z]{2,})",
            legislative_resolution_start,
            Scope::First,
        )?,
        RewriteRule::computed(
            "chamber-resolution-start",
            r"^\n +PROVIDING",
            chamber_resolution_start,
            Scope::First,
        )?,
    ])
}

pub fn bill_header_rules() -> Result<Vec<RewriteRule>, SpotCheckError> {
    Ok(vec![
        RewriteRule::literal(
            "state-of-new-york",
            r"^\n\n {12}STATE OF NEW YORK\n",
            &format!("\n{}\n", spaced(27, "S T A T E   O F   N E W   Y O R K")),
            Scope::First,
        )?,
        RewriteRule::literal(
            "in-senate",
            r"\n {16}IN SENATE\n",
            &format!("\n{}\n", spaced(35, "I N  S E N A T E")),
            Scope::First,
        )?,
        RewriteRule::literal(
            "in-assembly",
            r"\n {15}IN ASSEMBLY\n",
            &format!("\n{}\n", spaced(33, "I N  A S S E M B L Y")),
            Scope::First,
        )?,
        RewriteRule::literal(
            "senate-assembly",
            r"\n {12}SENATE - ASSEMBLY\n",
            &format!("\n{}\n", spaced(29, "S E N A T E - A S S E M B L Y")),
            Scope::First,
        )?,
    ])
}

// ============================================================================
// FORMATTING NORMALIZER
// ============================================================================

pub struct FormattingNormalizer {
    cleanup: Vec<RewriteRule>,
    resolution: Vec<RewriteRule>,
    bill_header: Vec<RewriteRule>,
}

impl FormattingNormalizer {
    pub fn new() -> Result<Self, SpotCheckError> {
        Ok(FormattingNormalizer {
            cleanup: cleanup_rules()?,
            resolution: resolution_rules()?,
            bill_header: bill_header_rules()?,
        })
    }

    /// Format reconstructed text for storage and comparison
    pub fn format_bill_text(&self, text: &str, bill_id: &BaseBillId) -> String {
        let cleaned = apply_rules(&self.cleanup, text, bill_id);
        apply_rules(self.branch_rules(bill_id), &cleaned, bill_id)
    }

    /// Rules that run after cleanup for this kind of bill
    pub fn branch_rules(&self, bill_id: &BaseBillId) -> &[RewriteRule] {
        if bill_id.bill_type.is_resolution() {
            &self.resolution
        } else {
            &self.bill_header
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
