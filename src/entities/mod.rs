// Entity Models
//
// Bills and amendments come from the primary data store.
// References, mismatches and observations belong to the spot check itself.

pub mod bill;
pub mod spotcheck;

pub use bill::{BaseBillId, Bill, BillAmendment, BillId, BillType, Chamber, Version};
pub use spotcheck::{
    BillTextReference, MismatchType, SpotCheckMismatch, SpotCheckObservation, SpotCheckRefType,
    SpotCheckReferenceId,
};
