//! Patient header: name and ABHA number on the first line, the inline status
//! message (submit outcome, command feedback) on the second.

use crate::theme::{StatusKind, Theme};
use dxterm_core::types::Patient;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// A message shown under the patient line until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }
}

pub struct PatientHeader<'a> {
    patient: &'a Patient,
    status: Option<&'a StatusMessage>,
    theme: &'a Theme,
}

impl<'a> PatientHeader<'a> {
    pub fn new(patient: &'a Patient, status: Option<&'a StatusMessage>, theme: &'a Theme) -> Self {
        Self { patient, status, theme }
    }
}

impl Widget for PatientHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" dxterm consultation ")
            .border_style(self.theme.border_unfocused);

        let patient = Line::from(vec![
            Span::styled(
                if self.patient.name.is_empty() { "Unknown patient" } else { self.patient.name.as_str() },
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   ABHA: "),
            Span::raw(self.patient.abha_number.as_str()),
        ]);
        let status = match self.status {
            Some(msg) => Line::from(Span::styled(msg.text.as_str(), self.theme.status_style(msg.kind))),
            None => Line::from(Span::styled("? for help, : for commands", self.theme.row_placeholder)),
        };

        Paragraph::new(vec![patient, status]).block(block).render(area, buf);
    }
}
