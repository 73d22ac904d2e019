//! ClinVar variant records and VCV document extraction

pub mod models;
pub mod parser;

pub use models::{ClinicalAssertion, InterpretationEntry, VariantRecord};
pub use parser::{parse_variant_records, parse_variant_records_strict};
