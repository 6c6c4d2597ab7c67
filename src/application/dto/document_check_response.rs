use crate::bom_structure::domain::ReconciliationReport;
use crate::bom_structure::policies::QuantityMode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// DocumentCheckResponse - reconciliation of one document against its article's BOM
#[derive(Debug, Clone, Serialize)]
pub struct DocumentCheckResponse {
    /// Identifies this analysis in logs and stored reports
    pub analysis_id: Uuid,
    pub checked_at: DateTime<Utc>,
    pub quantity_mode: QuantityMode,
    #[serde(flatten)]
    pub report: ReconciliationReport,
}

impl DocumentCheckResponse {
    pub fn new(report: ReconciliationReport, quantity_mode: QuantityMode) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            checked_at: Utc::now(),
            quantity_mode,
            report,
        }
    }

    pub fn has_discrepancies(&self) -> bool {
        self.report.has_discrepancies()
    }
}
