use std::fmt;

use serde::{Deserialize, Serialize};

/// One `VariationArchive` from a ClinVar VCV document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariantRecord {
    /// `VariationID` attribute, if present
    pub variation_id: Option<String>,
    /// `VariationName` attribute, if present
    pub variation_name: Option<String>,
    /// RCV interpretations in document order (duplicates kept)
    pub interpretations: Vec<InterpretationEntry>,
    /// Per-submitter assertions from `ClinicalAssertionList`
    pub assertions: Vec<ClinicalAssertion>,
}

/// Clinical interpretation of a variant for one condition (an RCV record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationEntry {
    pub condition: String,
    pub interpretation: String,
    pub review_status: String,
    pub date_last_evaluated: String,
    pub rcv_accession: String,
    pub submission_count: String,
}

/// A single submitter's classification of the variant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClinicalAssertion {
    pub submitter: Option<String>,
    pub classification: Option<String>,
}

impl VariantRecord {
    pub fn has_interpretations(&self) -> bool {
        !self.interpretations.is_empty()
    }

    /// Distinct interpretation labels, in first-seen order
    pub fn interpretation_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for entry in &self.interpretations {
            if !labels.contains(&entry.interpretation.as_str()) {
                labels.push(&entry.interpretation);
            }
        }
        labels
    }
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VariationID: {}\nName: {}",
            or_none(&self.variation_id),
            or_none(&self.variation_name)
        )?;
        for entry in &self.interpretations {
            write!(f, "\n{entry}")?;
        }
        Ok(())
    }
}

impl fmt::Display for InterpretationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\tCondition: {}", self.condition)?;
        writeln!(f, "\tInterpretation: {}", self.interpretation)?;
        writeln!(f, "\tReviewStatus: {}", self.review_status)?;
        writeln!(f, "\tDateLastEvaluated: {}", self.date_last_evaluated)?;
        writeln!(f, "\tRCVAccession: {}", self.rcv_accession)?;
        writeln!(f, "\tSubmissionCount: {}", self.submission_count)
    }
}

impl fmt::Display for ClinicalAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\tSubmitter: {}\n\tClassification: {}",
            or_none(&self.submitter),
            or_none(&self.classification)
        )
    }
}
