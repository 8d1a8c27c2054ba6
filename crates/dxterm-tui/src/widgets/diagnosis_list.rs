//! Diagnosis rows of the consultation form: one line per row with the name
//! followed by each coded system in its theme colour.

use crate::theme::Theme;
use dxterm_core::Selection;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Widget},
};

pub struct DiagnosisList<'a> {
    rows: &'a [Selection],
    selected: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> DiagnosisList<'a> {
    pub fn new(rows: &'a [Selection], selected: usize, focused: bool, theme: &'a Theme) -> Self {
        Self { rows, selected, focused, theme }
    }

    fn row_line(&self, index: usize, row: &Selection) -> Line<'a> {
        let mut spans = vec![Span::raw(format!("{:>2}. ", index + 1))];
        if row.name.is_empty() {
            spans.push(Span::styled("(empty, press / to search)", self.theme.row_placeholder));
        } else {
            spans.push(Span::raw(row.name.clone()));
            for code in &row.codes {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!("{} {}", code.system.short_label(), code.code),
                    self.theme.code_style(code.system),
                ));
            }
        }
        let line = Line::from(spans);
        if index == self.selected {
            line.style(self.theme.row_selected)
        } else {
            line
        }
    }
}

impl Widget for DiagnosisList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered()
            .title(format!(" Diagnoses ({}) ", self.rows.len()))
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        // Keep the selected row on screen.
        let height = inner.height as usize;
        let skip = (self.selected + 1).saturating_sub(height);

        for (offset, (index, row)) in self.rows.iter().enumerate().skip(skip).take(height).enumerate() {
            let line = self.row_line(index, row);
            buf.set_line(inner.x, inner.y + offset as u16, &line, inner.width);
        }
    }
}
