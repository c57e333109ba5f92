// 📜 Bill Entity - Identifiers, versions and amendments
//
// A bill is identified by type letter + number + session year.
// Each amendment (version) carries its own full text and sponsor memo.
//
// BaseBillId groups every amendment of one bill, BillId points at a single one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::SpotCheckError;

// ============================================================================
// CHAMBER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chamber {
    Senate,
    Assembly,
}

impl Chamber {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chamber::Senate => "SENATE",
            Chamber::Assembly => "ASSEMBLY",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BILL TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BillType {
    /// Senate bill
    S,
    /// Senate resolution
    J,
    /// Senate concurrent resolution
    B,
    /// Senate rules resolution
    R,
    /// Assembly bill
    A,
    /// Assembly resolution
    E,
    /// Assembly concurrent resolution
    C,
    /// Assembly resolution (alternate series)
    K,
    /// Joint resolution
    L,
}

impl BillType {
    /// Parse a bill type letter (case-insensitive)
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'S' => Some(BillType::S),
            'J' => Some(BillType::J),
            'B' => Some(BillType::B),
            'R' => Some(BillType::R),
            'A' => Some(BillType::A),
            'E' => Some(BillType::E),
            'C' => Some(BillType::C),
            'K' => Some(BillType::K),
            'L' => Some(BillType::L),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            BillType::S => 'S',
            BillType::J => 'J',
            BillType::B => 'B',
            BillType::R => 'R',
            BillType::A => 'A',
            BillType::E => 'E',
            BillType::C => 'C',
            BillType::K => 'K',
            BillType::L => 'L',
        }
    }

    pub fn chamber(&self) -> Chamber {
        match self {
            BillType::S | BillType::J | BillType::B | BillType::R => Chamber::Senate,
            BillType::A | BillType::E | BillType::C | BillType::K | BillType::L => {
                Chamber::Assembly
            }
        }
    }

    /// Resolutions carry no sponsor memo and a different text layout
    pub fn is_resolution(&self) -> bool {
        !matches!(self, BillType::S | BillType::A)
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ============================================================================
// VERSION
// ============================================================================

/// Amendment version: the base (original) print or a letter suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Version {
    Base,
    Amendment(char),
}

impl Version {
    /// Parse an optional version letter; `None` is the base version
    pub fn from_suffix(suffix: Option<&str>) -> Result<Self, SpotCheckError> {
        let Some(suffix) = suffix.filter(|s| !s.is_empty()) else {
            return Ok(Version::Base);
        };

        let mut chars = suffix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(Version::Amendment(c.to_ascii_uppercase()))
            }
            _ => Err(SpotCheckError::InvalidPrintNo(suffix.to_string())),
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Version::Base)
    }

    /// Letter as it appears in a print number ("" for the base version)
    pub fn suffix(&self) -> String {
        match self {
            Version::Base => String::new(),
            Version::Amendment(c) => c.to_string(),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Base => f.write_str("DEFAULT"),
            Version::Amendment(c) => write!(f, "{}", c),
        }
    }
}

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Bill identity without amendment version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaseBillId {
    pub bill_type: BillType,
    pub number: u32,
    pub session: i32,
}

impl BaseBillId {
    pub fn new(bill_type: BillType, number: u32, session: i32) -> Self {
        BaseBillId {
            bill_type,
            number,
            session,
        }
    }

    /// Parse a base print number such as "S1234" for the given session
    pub fn from_print_no(print_no: &str, session: i32) -> Result<Self, SpotCheckError> {
        let mut chars = print_no.chars();
        let letter = chars
            .next()
            .ok_or_else(|| SpotCheckError::InvalidPrintNo(print_no.to_string()))?;
        let bill_type = BillType::from_letter(letter)
            .ok_or_else(|| SpotCheckError::UnknownBillType(letter.to_string()))?;
        let number = chars
            .as_str()
            .parse::<u32>()
            .map_err(|_| SpotCheckError::InvalidPrintNo(print_no.to_string()))?;

        Ok(BaseBillId::new(bill_type, number, session))
    }

    /// Parse the display form "S1234-2015"
    pub fn parse(text: &str) -> Result<Self, SpotCheckError> {
        let (print_no, session) = text
            .trim()
            .split_once('-')
            .ok_or_else(|| SpotCheckError::InvalidPrintNo(text.to_string()))?;
        let session = session
            .parse::<i32>()
            .map_err(|_| SpotCheckError::InvalidPrintNo(text.to_string()))?;

        BaseBillId::from_print_no(print_no, session)
    }

    pub fn chamber(&self) -> Chamber {
        self.bill_type.chamber()
    }

    pub fn print_no(&self) -> String {
        format!("{}{}", self.bill_type, self.number)
    }

    pub fn with_version(&self, version: Version) -> BillId {
        BillId {
            base: self.clone(),
            version,
        }
    }
}

impl fmt::Display for BaseBillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.print_no(), self.session)
    }
}

/// Identity of one specific amendment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillId {
    pub base: BaseBillId,
    pub version: Version,
}

impl BillId {
    pub fn base(&self) -> &BaseBillId {
        &self.base
    }

    pub fn bill_type(&self) -> BillType {
        self.base.bill_type
    }

    pub fn print_no(&self) -> String {
        format!("{}{}", self.base.print_no(), self.version.suffix())
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.print_no(), self.base.session)
    }
}

// ============================================================================
// BILL + AMENDMENTS (owned by the primary data store)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillAmendment {
    pub bill_id: BillId,
    pub full_text: String,
    pub memo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub base_bill_id: BaseBillId,

    /// None when the primary store never published an active amendment
    pub active_version: Option<Version>,

    pub amendments: BTreeMap<Version, BillAmendment>,
}

impl Bill {
    pub fn new(base_bill_id: BaseBillId) -> Self {
        Bill {
            base_bill_id,
            active_version: None,
            amendments: BTreeMap::new(),
        }
    }

    /// Add (or replace) an amendment's text and memo
    pub fn add_amendment(&mut self, version: Version, full_text: &str, memo: &str) {
        let bill_id = self.base_bill_id.with_version(version);
        self.amendments.insert(
            version,
            BillAmendment {
                bill_id,
                full_text: full_text.to_string(),
                memo: memo.to_string(),
            },
        );
    }

    pub fn has_amendment(&self, version: Version) -> bool {
        self.amendments.contains_key(&version)
    }

    pub fn amendment(&self, version: Version) -> Option<&BillAmendment> {
        self.amendments.get(&version)
    }

    /// Active version as reported in mismatches ("" when unset)
    pub fn active_version_label(&self) -> String {
        self.active_version
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

// ============================================================================
// TESTS
// ============================================================================
