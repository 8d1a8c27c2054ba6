//! Help popup: centred overlay listing keybindings and commands.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Quit"),
    ("Tab", "Cycle focus: diagnoses / search"),
    ("/", "Search diagnoses for the selected row"),
    ("Escape", "Leave the search input"),
    ("↑ k  /  ↓ j", "Select row or highlight suggestion"),
    ("Enter", "Commit highlighted suggestion"),
    ("a", "Add a diagnosis row"),
    ("d", "Remove the selected row"),
    ("?", "Toggle this help popup"),
    (":note <text>", "Set consultation notes"),
    (":med n; dose; freq; dur", "Add a medication"),
    (":theme <name>", "default | gruvbox"),
    (":save", "Submit the consultation"),
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(72, BINDINGS.len() as u16 + 2, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" dxterm keybindings (? to close) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("  {:<26}", key), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(*desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
