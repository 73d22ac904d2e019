//! Flattening of ClinVar VCV documents (`efetch db=clinvar rettype=vcv`)
//!
//! The document is streamed with `quick_xml::Reader`. Every `VariationArchive`
//! element, at any depth, becomes one [`VariantRecord`]:
//!
//! - `VariationID` / `VariationName` attributes of the archive element
//! - one [`InterpretationEntry`] per `RCVAccession` found under an `RCVList`,
//!   built from its `Interpretation`, `ReviewStatus`, `DateLastEvaluated`,
//!   `Accession` and `SubmissionCount` attributes plus the text of its first
//!   `InterpretedCondition` descendant
//! - one [`ClinicalAssertion`] per `ClinicalAssertionList/ClinicalAssertion`
//!
//! An RCV entry missing any of its six fields is incomplete. The lenient
//! parser drops just that entry and logs it; the strict parser fails the whole
//! document.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::clinvar::models::{ClinicalAssertion, InterpretationEntry, VariantRecord};
use crate::error::{EntrezError, Result};

const VARIATION_ARCHIVE: &[u8] = b"VariationArchive";
const RCV_LIST: &[u8] = b"RCVList";
const RCV_ACCESSION: &[u8] = b"RCVAccession";
const INTERPRETED_CONDITION: &[u8] = b"InterpretedCondition";
const CLINICAL_ASSERTION_LIST: &[u8] = b"ClinicalAssertionList";
const CLINICAL_ASSERTION: &[u8] = b"ClinicalAssertion";
const CLINVAR_ACCESSION: &[u8] = b"ClinVarAccession";
const INTERPRETATION: &[u8] = b"Interpretation";
const DESCRIPTION: &[u8] = b"Description";

/// Extract variant records, skipping incomplete RCV entries
///
/// # Example
///
/// ```
/// use entrez_variants::clinvar::parse_variant_records;
///
/// let xml = r#"<ClinVarResult-Set>
///   <VariationArchive VariationID="7105" VariationName="c.79G>T">
///     <InterpretedRecord><RCVList>
///       <RCVAccession Accession="RCV000007523" Interpretation="Pathogenic"
///           ReviewStatus="no assertion criteria provided"
///           DateLastEvaluated="2019-05-01" SubmissionCount="1">
///         <InterpretedConditionList>
///           <InterpretedCondition DB="MedGen">Cystic fibrosis</InterpretedCondition>
///         </InterpretedConditionList>
///       </RCVAccession>
///     </RCVList></InterpretedRecord>
///   </VariationArchive>
/// </ClinVarResult-Set>"#;
///
/// let records = parse_variant_records(xml).unwrap();
/// assert_eq!(records[0].variation_id.as_deref(), Some("7105"));
/// assert_eq!(records[0].interpretations[0].condition, "Cystic fibrosis");
/// ```
pub fn parse_variant_records(xml: &str) -> Result<Vec<VariantRecord>> {
    VcvParser::new(xml, Mode::Lenient).run()
}

/// Extract variant records, failing on the first incomplete RCV entry
pub fn parse_variant_records_strict(xml: &str) -> Result<Vec<VariantRecord>> {
    VcvParser::new(xml, Mode::Strict).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lenient,
    Strict,
}

/// A start tag copied out of the reader buffer
struct OpenTag {
    name: Vec<u8>,
    attrs: Vec<(Vec<u8>, String)>,
}

impl OpenTag {
    fn attr(&self, key: &[u8]) -> Option<String> {
        self.attrs
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v.clone())
    }
}

enum Step {
    Open(OpenTag),
    Close,
    Eof,
    Other,
}

struct RecordBuilder {
    depth: usize,
    slot: usize,
    record: VariantRecord,
}

#[derive(Default)]
struct RcvBuilder {
    depth: usize,
    accession: Option<String>,
    interpretation: Option<String>,
    review_status: Option<String>,
    date_last_evaluated: Option<String>,
    submission_count: Option<String>,
    condition: Option<String>,
}

impl RcvBuilder {
    fn from_tag(tag: &OpenTag, depth: usize) -> Self {
        Self {
            depth,
            accession: tag.attr(b"Accession"),
            interpretation: tag.attr(b"Interpretation"),
            review_status: tag.attr(b"ReviewStatus"),
            date_last_evaluated: tag.attr(b"DateLastEvaluated"),
            submission_count: tag.attr(b"SubmissionCount"),
            condition: None,
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("InterpretedCondition", self.condition.is_none()),
            ("Interpretation", self.interpretation.is_none()),
            ("ReviewStatus", self.review_status.is_none()),
            ("DateLastEvaluated", self.date_last_evaluated.is_none()),
            ("Accession", self.accession.is_none()),
            ("SubmissionCount", self.submission_count.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, missing)| missing.then_some(field))
        .collect()
    }

    fn build(self) -> std::result::Result<InterpretationEntry, (Option<String>, Vec<&'static str>)> {
        let missing = self.missing_fields();
        match self {
            RcvBuilder {
                condition: Some(condition),
                interpretation: Some(interpretation),
                review_status: Some(review_status),
                date_last_evaluated: Some(date_last_evaluated),
                accession: Some(rcv_accession),
                submission_count: Some(submission_count),
                ..
            } => Ok(InterpretationEntry {
                condition,
                interpretation,
                review_status,
                date_last_evaluated,
                rcv_accession,
                submission_count,
            }),
            RcvBuilder { accession, .. } => Err((accession, missing)),
        }
    }
}

struct AssertionBuilder {
    depth: usize,
    assertion: ClinicalAssertion,
}

struct VcvParser<'a> {
    reader: Reader<&'a [u8]>,
    mode: Mode,
    buf: Vec<u8>,
    stack: Vec<Vec<u8>>,
    open_records: Vec<RecordBuilder>,
    slots: Vec<Option<VariantRecord>>,
    rcv: Option<RcvBuilder>,
    assertion: Option<AssertionBuilder>,
    skipped: usize,
}

impl<'a> VcvParser<'a> {
    fn new(xml: &'a str, mode: Mode) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().expand_empty_elements = true;

        Self {
            reader,
            mode,
            buf: Vec::new(),
            stack: Vec::new(),
            open_records: Vec::new(),
            slots: Vec::new(),
            rcv: None,
            assertion: None,
            skipped: 0,
        }
    }

    fn run(mut self) -> Result<Vec<VariantRecord>> {
        loop {
            match self.next_step()? {
                Step::Open(tag) => self.open(tag)?,
                Step::Close => self.close()?,
                Step::Eof => break,
                Step::Other => {}
            }
        }

        if !self.stack.is_empty() {
            return Err(EntrezError::Xml(format!(
                "unexpected end of document inside <{}>",
                String::from_utf8_lossy(self.stack.last().map(Vec::as_slice).unwrap_or_default())
            )));
        }

        let records: Vec<VariantRecord> = self.slots.into_iter().flatten().collect();
        debug!(
            records = records.len(),
            skipped_rcv_entries = self.skipped,
            "Parsed ClinVar VCV document"
        );
        Ok(records)
    }

    fn next_step(&mut self) -> Result<Step> {
        let step = match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(e) => Step::Open(copy_tag(&e)?),
            Event::End(_) => Step::Close,
            Event::Eof => Step::Eof,
            _ => Step::Other,
        };
        self.buf.clear();
        Ok(step)
    }

    fn parent(&self) -> Option<&[u8]> {
        self.stack.last().map(Vec::as_slice)
    }

    fn grandparent(&self) -> Option<&[u8]> {
        self.stack
            .len()
            .checked_sub(2)
            .map(|i| self.stack[i].as_slice())
    }

    /// Whether an `RCVList` sits between the innermost open record and here
    fn inside_rcv_list(&self) -> bool {
        match self.open_records.last() {
            Some(record) => self.stack[record.depth..]
                .iter()
                .any(|name| name.as_slice() == RCV_LIST),
            None => false,
        }
    }

    fn open(&mut self, tag: OpenTag) -> Result<()> {
        let name = tag.name.as_slice();

        if name == INTERPRETED_CONDITION && self.rcv.as_ref().is_some_and(|r| r.condition.is_none())
        {
            let text = self.read_text(INTERPRETED_CONDITION)?;
            if let Some(rcv) = self.rcv.as_mut() {
                rcv.condition = Some(text);
            }
            return Ok(());
        }

        if name == DESCRIPTION
            && self.assertion.is_some()
            && self.parent() == Some(INTERPRETATION)
            && self.grandparent() == Some(CLINICAL_ASSERTION)
        {
            let text = self.read_text(DESCRIPTION)?;
            if let Some(builder) = self.assertion.as_mut() {
                builder.assertion.classification = Some(text);
            }
            return Ok(());
        }

        let depth = self.stack.len();

        if name == VARIATION_ARCHIVE {
            self.slots.push(None);
            self.open_records.push(RecordBuilder {
                depth: depth + 1,
                slot: self.slots.len() - 1,
                record: VariantRecord {
                    variation_id: tag.attr(b"VariationID"),
                    variation_name: tag.attr(b"VariationName"),
                    ..Default::default()
                },
            });
        } else if name == RCV_ACCESSION && self.rcv.is_none() && self.inside_rcv_list() {
            self.rcv = Some(RcvBuilder::from_tag(&tag, depth + 1));
        } else if name == CLINICAL_ASSERTION
            && self.assertion.is_none()
            && !self.open_records.is_empty()
            && self.parent() == Some(CLINICAL_ASSERTION_LIST)
        {
            self.assertion = Some(AssertionBuilder {
                depth: depth + 1,
                assertion: ClinicalAssertion::default(),
            });
        } else if name == CLINVAR_ACCESSION && self.parent() == Some(CLINICAL_ASSERTION) {
            if let Some(builder) = self.assertion.as_mut() {
                builder.assertion.submitter = tag.attr(b"SubmitterName");
            }
        }

        self.stack.push(tag.name);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let depth = self.stack.len();
        if self.stack.pop().is_none() {
            return Err(EntrezError::Xml("unmatched closing tag".to_string()));
        }

        if self.rcv.as_ref().is_some_and(|r| r.depth == depth) {
            if let Some(rcv) = self.rcv.take() {
                self.finish_rcv(rcv)?;
            }
        } else if self.assertion.as_ref().is_some_and(|a| a.depth == depth) {
            if let (Some(builder), Some(record)) =
                (self.assertion.take(), self.open_records.last_mut())
            {
                record.record.assertions.push(builder.assertion);
            }
        } else if self.open_records.last().is_some_and(|r| r.depth == depth) {
            if let Some(builder) = self.open_records.pop() {
                self.slots[builder.slot] = Some(builder.record);
            }
        }

        Ok(())
    }

    fn finish_rcv(&mut self, rcv: RcvBuilder) -> Result<()> {
        match rcv.build() {
            Ok(entry) => {
                if let Some(record) = self.open_records.last_mut() {
                    record.record.interpretations.push(entry);
                }
                Ok(())
            }
            Err((accession, missing)) => {
                let accession = accession.unwrap_or_else(|| "<unknown>".to_string());
                match self.mode {
                    Mode::Strict => Err(EntrezError::MalformedResponse {
                        message: format!(
                            "RCV entry {accession} is missing {}",
                            missing.join(", ")
                        ),
                    }),
                    Mode::Lenient => {
                        warn!(
                            rcv_accession = %accession,
                            missing = ?missing,
                            "Skipping incomplete RCV entry"
                        );
                        self.skipped += 1;
                        Ok(())
                    }
                }
            }
        }
    }

    /// Collect the text of the element whose start tag was just consumed,
    /// through its matching end tag
    fn read_text(&mut self, tag: &[u8]) -> Result<String> {
        let mut text = String::new();
        let mut depth: u32 = 1;

        loop {
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(ref e) if e.name().as_ref() == tag => depth += 1,
                Event::Text(ref e) => text.push_str(&e.unescape()?),
                Event::CData(ref e) => text.push_str(&String::from_utf8_lossy(e)),
                Event::End(ref e) if e.name().as_ref() == tag => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Event::Eof => {
                    return Err(EntrezError::Xml(format!(
                        "unexpected end of document inside <{}>",
                        String::from_utf8_lossy(tag)
                    )));
                }
                _ => {}
            }
            self.buf.clear();
        }
        self.buf.clear();

        Ok(text.trim().to_string())
    }
}

const CAPTURED_ATTRS: [&[u8]; 3] = [VARIATION_ARCHIVE, RCV_ACCESSION, CLINVAR_ACCESSION];

fn copy_tag(e: &BytesStart) -> Result<OpenTag> {
    let name = e.name().as_ref().to_vec();
    let mut attrs = Vec::new();

    if CAPTURED_ATTRS.contains(&name.as_slice()) {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| EntrezError::Xml(err.to_string()))?;
            let value = attr.unescape_value()?.into_owned();
            attrs.push((attr.key.as_ref().to_vec(), value));
        }
    }

    Ok(OpenTag { name, attrs })
}
