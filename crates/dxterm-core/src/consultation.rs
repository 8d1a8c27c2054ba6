//! Consultation draft — the form state that consumes diagnosis selections.
//!
//! Serialises to the body expected by `POST /doctor/consultation`.

use crate::types::{Medication, Patient, Selection};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDraft {
    pub patient_identifier: String,
    pub diagnoses: Vec<Selection>,
    pub medications: Vec<Medication>,
    pub notes: String,
}

impl ConsultationDraft {
    /// A fresh form for `patient`: one blank diagnosis row and one blank
    /// medication row.
    pub fn new(patient: &Patient) -> Self {
        Self {
            patient_identifier: patient.abha_number.clone(),
            diagnoses: vec![Selection::default()],
            medications: vec![Medication::default()],
            notes: String::new(),
        }
    }

    pub fn add_diagnosis(&mut self) -> usize {
        self.diagnoses.push(Selection::default());
        self.diagnoses.len() - 1
    }

    pub fn remove_diagnosis(&mut self, index: usize) -> Option<Selection> {
        (index < self.diagnoses.len()).then(|| self.diagnoses.remove(index))
    }

    /// Replace row `index` with `selection`, appending a row when the list is
    /// empty or `index` is past the end.
    pub fn apply_selection(&mut self, index: usize, selection: Selection) -> usize {
        match self.diagnoses.get_mut(index) {
            Some(row) => {
                *row = selection;
                index
            }
            None => {
                self.diagnoses.push(selection);
                self.diagnoses.len() - 1
            }
        }
    }

    pub fn add_medication(&mut self, medication: Medication) -> usize {
        // The form starts with a blank row; fill it before growing the list.
        match self.medications.iter_mut().find(|m| **m == Medication::default()) {
            Some(blank) => {
                *blank = medication;
            }
            None => self.medications.push(medication),
        }
        self.medications.len()
    }

    pub fn remove_medication(&mut self, index: usize) -> Option<Medication> {
        (index < self.medications.len()).then(|| self.medications.remove(index))
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Rows that carry a diagnosis name.
    pub fn filled_diagnoses(&self) -> usize {
        self.diagnoses.iter().filter(|d| !d.name.is_empty()).count()
    }
}
