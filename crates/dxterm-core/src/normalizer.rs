//! Normalizer — maps a chosen diagnosis onto its coding-system entries.
//!
//! A dataset row carries one free-text title and up to four independent code
//! columns. [`to_selection`] reconciles them into a [`Selection`] whose codes
//! follow [`CodingSystem::PRIORITY`] and all share the title as display text.

use crate::types::{CodeEntry, CodingSystem, DiagnosisRecord, Selection, TerminologyMatch};

/// Placeholder the dataset export writes for an empty cell.
pub const MISSING_SENTINEL: &str = "nan";

/// A code cell counts only when it is non-empty and not the `"nan"` sentinel.
pub fn is_present(code: &str) -> bool {
    !code.is_empty() && code != MISSING_SENTINEL
}

/// Build the [`Selection`] for a dataset row.
pub fn to_selection(record: &DiagnosisRecord) -> Selection {
    let name = record.title().unwrap_or_default().to_string();
    let codes = CodingSystem::PRIORITY
        .iter()
        .filter_map(|&system| {
            let code = record.get(system.source_column())?;
            is_present(code).then(|| CodeEntry {
                system,
                code: code.to_string(),
                display: name.clone(),
            })
        })
        .collect();

    tracing::debug!(name = %name, "normalizer: record mapped to selection");
    Selection { name, codes }
}

/// Build the [`Selection`] for a remote terminology match. The backend already
/// returns coded entries; the same presence rule still applies.
pub fn from_match(m: &TerminologyMatch) -> Selection {
    Selection {
        name: m.display_name.clone(),
        codes: m
            .codes
            .iter()
            .filter(|c| is_present(&c.code))
            .cloned()
            .collect(),
    }
}
