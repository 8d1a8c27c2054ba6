//! Core types for dxterm-core.
//!
//! This module defines the data structures shared across all layers: the raw
//! [`DiagnosisRecord`] loaded from the dataset, the [`CodingSystem`] each code
//! belongs to, the normalised [`Selection`] handed to the hosting form, and the
//! [`Suggestion`] shown in the autocomplete popup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Dataset column holding the human-readable diagnosis title.
pub const TITLE_COLUMN: &str = "ICD11_Title";

/// Coding system a [`CodeEntry`] belongs to.
///
/// Variants are declared in display priority order; [`CodingSystem::PRIORITY`]
/// is the canonical iteration order when building a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CodingSystem {
    #[serde(rename = "ICD-11")]
    Icd11,
    #[serde(rename = "NAMASTE-Ayurveda")]
    Ayurveda,
    #[serde(rename = "NAMASTE-Siddha")]
    Siddha,
    #[serde(rename = "NAMASTE-Unani")]
    Unani,
}

impl CodingSystem {
    pub const PRIORITY: [CodingSystem; 4] = [
        CodingSystem::Icd11,
        CodingSystem::Ayurveda,
        CodingSystem::Siddha,
        CodingSystem::Unani,
    ];

    /// Dataset column that carries this system's code.
    pub fn source_column(self) -> &'static str {
        match self {
            CodingSystem::Icd11 => "ICD11_Code",
            CodingSystem::Ayurveda => "Ayurveda_NAMC_CODE",
            CodingSystem::Siddha => "Siddha_NAMC_CODE",
            CodingSystem::Unani => "Unani_NUMC_CODE",
        }
    }

    /// Short label used in one-line suggestion details.
    pub fn short_label(self) -> &'static str {
        match self {
            CodingSystem::Icd11 => "ICD-11",
            CodingSystem::Ayurveda => "Ayurveda",
            CodingSystem::Siddha => "Siddha",
            CodingSystem::Unani => "Unani",
        }
    }
}

impl std::fmt::Display for CodingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodingSystem::Icd11 => write!(f, "ICD-11"),
            CodingSystem::Ayurveda => write!(f, "NAMASTE-Ayurveda"),
            CodingSystem::Siddha => write!(f, "NAMASTE-Siddha"),
            CodingSystem::Unani => write!(f, "NAMASTE-Unani"),
        }
    }
}

/// One code in one coding system.
///
/// Only ever built from a value that passed
/// [`normalizer::is_present`](crate::normalizer::is_present).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeEntry {
    pub system: CodingSystem,
    pub code: String,
    pub display: String,
}

/// A raw dataset row: column name to cell value.
///
/// Columns that were missing from a short row are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisRecord {
    columns: HashMap<String, String>,
}

impl DiagnosisRecord {
    pub fn new(columns: HashMap<String, String>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// The `ICD11_Title` cell, if the row has one.
    pub fn title(&self) -> Option<&str> {
        self.get(TITLE_COLUMN)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DiagnosisRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A committed diagnosis: one display name reconciled with up to four codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,
    pub codes: Vec<CodeEntry>,
}

/// One item of the `/terminology/search` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminologyMatch {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub codes: Vec<CodeEntry>,
}

/// A candidate shown in the autocomplete popup.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    /// A row of the local CSV dataset.
    Record(Arc<DiagnosisRecord>),
    /// A match returned by the remote terminology search.
    Remote(TerminologyMatch),
}

impl Suggestion {
    pub fn display_name(&self) -> &str {
        match self {
            Suggestion::Record(record) => record.title().unwrap_or_default(),
            Suggestion::Remote(m) => &m.display_name,
        }
    }

    /// One-line code summary, e.g. `ICD-11: 5A10 | Ayurveda: AY-221`.
    pub fn detail(&self) -> String {
        match self {
            Suggestion::Record(record) => [CodingSystem::Icd11, CodingSystem::Ayurveda]
                .iter()
                .map(|s| format!("{}: {}", s.short_label(), record.get(s.source_column()).unwrap_or("")))
                .collect::<Vec<_>>()
                .join(" | "),
            Suggestion::Remote(m) => m
                .codes
                .iter()
                .map(|c| format!("{}: {}", c.system.short_label(), c.code))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    pub fn to_selection(&self) -> Selection {
        match self {
            Suggestion::Record(record) => crate::normalizer::to_selection(record),
            Suggestion::Remote(m) => crate::normalizer::from_match(m),
        }
    }
}

/// Patient shown in the consultation header. `abha_number` is submitted as
/// the consultation's `patientIdentifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub name: String,
    pub abha_number: String,
}

/// A prescribed medication row of the consultation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}
