//! SIMC registry to CSV conversion.
//!
//! The TERYT SIMC export nests records three levels deep:
//!
//! ```xml
//! <teryt>
//!   <catalog name="SIMC">
//!     <row>
//!       <col name="NAZWA">Kraków</col>
//!       <col name="SYM">123</col>
//!       <col name="SYMPOD">000</col>
//!     </row>
//!   </catalog>
//! </teryt>
//! ```
//!
//! Each `row` becomes one CSV row `name,sym,sympod`, in document order.

use std::io::Write;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::config::{SIMC_HEADER, SIMC_NAME_LABEL, SIMC_SYMPOD_LABEL, SIMC_SYM_LABEL};
use crate::error::{Result, WranglerError};
use crate::files::write_atomically;
use crate::types::RegistryRecord;
use crate::xml::{element_children, find_labeled_child, get_text, line_of, read_utf8};

/// What to do with a record that lacks one of the three labeled fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Fail the run with `MalformedRecord`.
    #[default]
    Reject,

    /// Emit the missing field as an empty string.
    Empty,
}

/// Extract all records from a parsed registry document.
///
/// Fields are looked up per record; a missing field never carries over a
/// value from an earlier record.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use mapdata_wrangler::simc::{parse_registry, MissingFieldPolicy};
///
/// let xml = r#"<teryt><catalog><row>
///     <col name="NAZWA">Kraków</col><col name="SYM">123</col><col name="SYMPOD">000</col>
/// </row></catalog></teryt>"#;
/// let doc = Document::parse(xml).unwrap();
/// let records = parse_registry(&doc, MissingFieldPolicy::Reject).unwrap();
/// assert_eq!(records[0].name, "Kraków");
/// ```
pub fn parse_registry(doc: &Document<'_>, policy: MissingFieldPolicy) -> Result<Vec<RegistryRecord>> {
    let mut records = Vec::new();

    for (catalog_idx, catalog) in element_children(doc.root_element()).enumerate() {
        for (record_idx, record) in element_children(catalog).enumerate() {
            let context = || {
                format!(
                    "catalog {}, record {} (line {})",
                    catalog_idx + 1,
                    record_idx + 1,
                    line_of(record)
                )
            };

            records.push(RegistryRecord {
                name: field(record, SIMC_NAME_LABEL, policy, context)?,
                sym: field(record, SIMC_SYM_LABEL, policy, context)?,
                sympod: field(record, SIMC_SYMPOD_LABEL, policy, context)?,
            });
        }
    }

    tracing::debug!(count = records.len(), "registry records extracted");
    Ok(records)
}

/// Text of the child labeled `label`, resolved against `policy` when absent.
fn field(
    record: Node<'_, '_>,
    label: &str,
    policy: MissingFieldPolicy,
    context: impl Fn() -> String,
) -> Result<String> {
    match find_labeled_child(record, label) {
        Some(node) => Ok(get_text(node)),
        None => match policy {
            MissingFieldPolicy::Reject => Err(WranglerError::malformed(
                context(),
                format!("missing field {label}"),
            )),
            MissingFieldPolicy::Empty => {
                tracing::warn!(field = label, record = %context(), "missing field left empty");
                Ok(String::new())
            }
        },
    }
}

/// Write records as CSV, header first.
///
/// The header is written even when there are no records.
pub fn write_registry_csv<W: Write>(records: &[RegistryRecord], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer.write_record(SIMC_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Convert a registry XML file into a CSV file.
///
/// # Returns
/// Number of rows written (excluding the header)
pub fn convert_registry(input: &Path, output: &Path, policy: MissingFieldPolicy) -> Result<usize> {
    let xml = read_utf8(input)?;
    let doc = Document::parse(&xml)?;
    let records = parse_registry(&doc, policy)?;

    write_atomically(output, |out| write_registry_csv(&records, out))?;

    tracing::info!(
        rows = records.len(),
        output = %output.display(),
        "registry converted"
    );
    Ok(records.len())
}
