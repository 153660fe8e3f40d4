//! Primary transaction-report assembler.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use tracing::info;

use mifir_model::{Constants, CustomFieldRegistry, Dataset, Mapping};

use crate::common::{REPORT_PROFILE, close_envelope, open_envelope};
use crate::transaction::{RowContext, write_transaction};

/// Assembles a full `auth.016.001.01` transaction report: one `Tx/New`
/// record per dataset row inside the BizData envelope.
///
/// Generation is a pure function of its inputs plus the clock; an
/// incomplete mapping degrades to placeholders and defaults, never to
/// an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(
        &self,
        dataset: &Dataset,
        mapping: &Mapping,
        constants: &Constants,
        registry: &CustomFieldRegistry,
    ) -> Result<String> {
        self.generate_at(Utc::now(), dataset, mapping, constants, registry)
    }

    /// Like [`generate`](Self::generate) with an explicit clock, so
    /// callers can pin wall-clock-derived values.
    pub fn generate_at(
        &self,
        now: DateTime<Utc>,
        dataset: &Dataset,
        mapping: &Mapping,
        constants: &Constants,
        registry: &CustomFieldRegistry,
    ) -> Result<String> {
        info!(rows = dataset.row_count(), "assembling transaction report");
        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        open_envelope(&mut xml, &REPORT_PROFILE, constants, now)?;
        for row in dataset.rows() {
            let ctx = RowContext {
                row,
                mapping,
                constants,
                registry,
                now,
            };
            write_transaction(&mut xml, &ctx)?;
        }
        close_envelope(&mut xml)?;
        String::from_utf8(xml.into_inner()).context("report output is not valid UTF-8")
    }
}
