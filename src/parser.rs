// 🏗️ Scraped Bill Parser - HTML page → BillTextReference
//
// Filename contract:  <session>-<print no>-<yyyyMMdd'T'HHmmss>.html
//                     e.g. 2015-S1234-20150310T143000.html
// Print no on page:   <span class="nv_bot_info"><strong>S1234-A</strong></span>
// Bill text:          <pre> children of #nv_bot_contents up to <hr class="noprint">
// Sponsor memo:       last <pre> of the page (bills only, resolutions have none)
//
// html5ever drops the line feed right after an opening <pre>. The page is
// patched with an extra one first so block text comes out verbatim.

use chrono::NaiveDateTime;
use regex::Regex;
use std::borrow::Cow;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::entities::{BaseBillId, BillId, BillTextReference, Version};
use crate::error::SpotCheckError;
use crate::formatting::FormattingNormalizer;
use crate::text::{reconstruct_blocks, reconstruct_text};

/// Timestamp layout inside scraped filenames
pub const SCRAPED_DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

const CONTENTS_ID: &str = "nv_bot_contents";
const NO_PRINT_CLASS: &str = "noprint";

// ============================================================================
// SCRAPED DOCUMENT
// ============================================================================

/// A raw page waiting in the inbox
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedDocument {
    /// File name, used as the source name contract
    pub name: String,
    pub content: String,
}

impl ScrapedDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        ScrapedDocument {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// What the filename alone tells us
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedFileName {
    pub base_bill_id: BaseBillId,
    pub ref_date_time: NaiveDateTime,
}

// ============================================================================
// PARSER
// ============================================================================

pub struct ScrapedBillTextParser {
    file_name_pattern: Regex,
    print_no_pattern: Regex,
    pre_open_pattern: Regex,
    print_no_selector: Selector,
    contents_selector: Selector,
    pre_selector: Selector,
    formatter: FormattingNormalizer,
}

/// Source-name contract shared by the parser and the directory scraper
pub fn scraped_file_name_pattern() -> Result<Regex, SpotCheckError> {
    Ok(Regex::new(r"^(\d{4})-([A-Za-z]\d+)-(\d{8}T\d{6})\.html$")?)
}

fn selector(css: &str) -> Result<Selector, SpotCheckError> {
    Selector::parse(css).map_err(|e| SpotCheckError::InvalidSelector(format!("{}: {:?}", css, e)))
}

impl ScrapedBillTextParser {
    pub fn new() -> Result<Self, SpotCheckError> {
        Ok(ScrapedBillTextParser {
            file_name_pattern: scraped_file_name_pattern()?,
            print_no_pattern: Regex::new(r"^([A-Za-z]\d+)(?:-([A-Za-z]))?$")?,
            pre_open_pattern: Regex::new(r"(?i)(<pre\b[^>]*>)(\r?\n)")?,
            print_no_selector: selector("span.nv_bot_info > strong")?,
            contents_selector: selector(&format!("#{}", CONTENTS_ID))?,
            pre_selector: selector("pre")?,
            formatter: FormattingNormalizer::new()?,
        })
    }

    /// Parse one scraped page into a reference
    ///
    /// Fails without a partial result when the filename or print number
    /// break their contracts.
    pub fn parse_reference(
        &self,
        document: &ScrapedDocument,
    ) -> Result<BillTextReference, SpotCheckError> {
        let file_name = self.parse_file_name(&document.name)?;
        let html = Html::parse_document(&self.restore_pre_newlines(&document.content));

        let bill_id = self.parse_print_no(&html, file_name.base_bill_id.session)?;
        let text = self.bill_text(&html, bill_id.base())?;
        let memo = self.memo_text(&html, bill_id.base())?;

        debug!(
            "Parsed {} ({}): {} text chars, {} memo chars",
            document.name,
            bill_id,
            text.len(),
            memo.len()
        );

        Ok(BillTextReference::new(
            bill_id,
            file_name.ref_date_time,
            text,
            memo,
        ))
    }

    /// Double the line feed that opens a <pre> block, one copy is eaten by the parser
    fn restore_pre_newlines<'c>(&self, content: &'c str) -> Cow<'c, str> {
        self.pre_open_pattern.replace_all(content, "${1}\n${2}")
    }

    /// Session, bill and scrape time encoded in the filename
    pub fn parse_file_name(&self, name: &str) -> Result<ScrapedFileName, SpotCheckError> {
        let invalid = || SpotCheckError::InvalidFilename(name.to_string());

        let caps = self.file_name_pattern.captures(name).ok_or_else(invalid)?;
        let session = caps[1].parse::<i32>().map_err(|_| invalid())?;
        let base_bill_id = BaseBillId::from_print_no(&caps[2], session).map_err(|_| invalid())?;
        let ref_date_time = NaiveDateTime::parse_from_str(&caps[3], SCRAPED_DATE_TIME_FORMAT)
            .map_err(|_| invalid())?;

        Ok(ScrapedFileName {
            base_bill_id,
            ref_date_time,
        })
    }

    fn parse_print_no(
        &self,
        html: &Html,
        session: i32,
    ) -> Result<BillId, SpotCheckError> {
        let element = html
            .select(&self.print_no_selector)
            .next()
            .ok_or(SpotCheckError::MissingElement("print no element"))?;
        let print_no: String = element.text().collect();
        let print_no = print_no.trim();

        let caps = self
            .print_no_pattern
            .captures(print_no)
            .ok_or_else(|| SpotCheckError::InvalidPrintNo(print_no.to_string()))?;

        let base = BaseBillId::from_print_no(&caps[1], session)?;
        let version = Version::from_suffix(caps.get(2).map(|m| m.as_str()))?;

        Ok(base.with_version(version))
    }

    /// <pre> blocks of the contents container, stopping at the no-print rule
    pub fn text_blocks<'a>(&self, html: &'a Html) -> Result<Vec<ElementRef<'a>>, SpotCheckError> {
        let contents = html
            .select(&self.contents_selector)
            .next()
            .ok_or(SpotCheckError::MissingElement("#nv_bot_contents container"))?;

        let mut blocks = Vec::new();
        for child in contents.children().filter_map(ElementRef::wrap) {
            let el = child.value();
            if el.name().eq_ignore_ascii_case("pre") {
                blocks.push(child);
            } else if el.name().eq_ignore_ascii_case("hr")
                && el.classes().any(|c| c == NO_PRINT_CLASS)
            {
                // fiscal notes and the like follow
                break;
            }
        }

        Ok(blocks)
    }

    fn bill_text(&self, html: &Html, base_bill_id: &BaseBillId) -> Result<String, SpotCheckError> {
        let blocks = self.text_blocks(html)?;
        let raw = reconstruct_blocks(blocks);
        Ok(self.formatter.format_bill_text(&raw, base_bill_id))
    }

    fn memo_text(&self, html: &Html, base_bill_id: &BaseBillId) -> Result<String, SpotCheckError> {
        if base_bill_id.bill_type.is_resolution() {
            return Ok(String::new());
        }

        let memo = html
            .select(&self.pre_selector)
            .last()
            .ok_or(SpotCheckError::MissingElement("memo <pre> block"))?;

        Ok(reconstruct_text(memo))
    }
}

// ============================================================================
// TESTS
// ============================================================================
