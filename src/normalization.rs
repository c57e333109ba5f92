// 🧹 Text Normalization Tiers
//
// Four strengths, used to localize where two texts diverge:
//   tier0  raw              - unmodified
//   tier1  normalized       - space runs collapsed, no spaces around newlines
//   tier2  super-normalized - only [A-Za-z0-9_] kept
//   tier3  ultra-normalized - tier1, minus line numbers and page headers, then tier2

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::entities::BillId;
use crate::error::SpotCheckError;

// ============================================================================
// TIERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextTiers {
    pub raw: String,
    pub normalized: String,
    pub super_normalized: String,
    pub ultra_normalized: String,
}

// ============================================================================
// NORMALIZER
// ============================================================================

pub struct TextNormalizer {
    space_run: Regex,
    newline_spaces: Regex,
    non_word: Regex,
    line_number: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self, SpotCheckError> {
        Ok(TextNormalizer {
            space_run: Regex::new(" +")?,
            newline_spaces: Regex::new(" *\n *")?,
            non_word: Regex::new("[^A-Za-z0-9_]+")?,
            line_number: Regex::new(r"\n\d{1,2} ")?,
        })
    }

    /// tier1: collapse space runs, strip spaces touching a newline
    pub fn normalize(&self, text: &str) -> String {
        let collapsed = self.space_run.replace_all(text, " ");
        self.newline_spaces
            .replace_all(&collapsed, "\n")
            .into_owned()
    }

    /// tier2: drop every non-word character
    pub fn super_normalize(&self, text: &str) -> String {
        self.non_word.replace_all(text, "").into_owned()
    }

    /// tier3: tier1, minus 1-2 digit line numbers and the running page header
    /// of `bill_id`, then tier2
    pub fn ultra_normalize(&self, text: &str, bill_id: &BillId) -> String {
        let normalized = self.normalize(text);
        let unnumbered = self.line_number.replace_all(&normalized, "\n");
        let unpaged = strip_page_markers(&unnumbered, bill_id);
        self.super_normalize(&unpaged)
    }

    pub fn tiers(&self, text: &str, bill_id: &BillId) -> TextTiers {
        TextTiers {
            raw: text.to_string(),
            normalized: self.normalize(text),
            super_normalized: self.super_normalize(text),
            ultra_normalized: self.ultra_normalize(text, bill_id),
        }
    }
}

// ============================================================================
// PAGE MARKERS
// ============================================================================

/// Running header printed on every page, e.g. "S. 1234--A 2"
pub fn page_marker_prefix(bill_id: &BillId) -> String {
    let version = if bill_id.version.is_base() {
        String::new()
    } else {
        format!("--{}", bill_id.version.suffix())
    };
    format!("{}. {}{} ", bill_id.bill_type(), bill_id.base.number, version)
}

fn is_page_marker(line: &str, prefix: &str) -> bool {
    line.len() == prefix.len() + 1
        && line.starts_with(prefix)
        && line.as_bytes()[prefix.len()].is_ascii_digit()
}

/// Blank out marker lines that sit between two newlines
fn strip_page_markers(text: &str, bill_id: &BillId) -> String {
    let prefix = page_marker_prefix(bill_id);
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            // first/last segments are not enclosed by newlines
            if i > 0 && i < last && is_page_marker(line, &prefix) {
                ""
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// TESTS
// ============================================================================
