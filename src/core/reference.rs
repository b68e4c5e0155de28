use chrono::{Datelike, Utc};
use uuid::Uuid;

/// Generates a human-readable document number, e.g. `SB-2026-1756368000123`.
/// The millisecond suffix matches the numbering scheme used on printed
/// invoices; collisions within one millisecond are caught by the unique
/// index on the column.
pub fn document_number(prefix: &str) -> String {
    let now = Utc::now();
    format!("{}-{}-{}", prefix, now.year(), now.timestamp_millis())
}

/// Generates a unique reference number for payments and credit notes,
/// e.g. `PAY-2026-9f8b21ac`. Safe to retry a failed submission with a fresh
/// reference; re-submitting the same reference is rejected by the store.
pub fn reference_number(prefix: &str) -> String {
    let now = Utc::now();
    let tail = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, now.year(), &tail[..8])
}
