//! Diagnosis search: a one-line text input plus the suggestion popup that
//! floats above it.
//!
//! The input owns only the edit buffer and the highlighted suggestion; the
//! suggestions themselves live in the [`QueryPipeline`](dxterm_core::QueryPipeline)
//! and are passed in at render time.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use dxterm_core::{SearchStatus, Suggestion};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AutocompleteState {
    pub input: String,
    /// Byte offset of the cursor within `input`.
    pub cursor: usize,
    /// Index into the pipeline's current suggestions.
    pub highlighted: usize,
}

impl AutocompleteState {
    /// Replace the buffer (after a selection or a row change) and park the
    /// cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor = self.input.len();
        self.highlighted = 0;
    }

    /// Apply an editing or navigation event.
    ///
    /// Returns `true` when the text changed, i.e. the pipeline must be fed a
    /// new keystroke. `Nav(Up|Down)` moves the highlight within
    /// `suggestion_count` entries.
    pub fn handle(&mut self, event: &AppEvent, suggestion_count: usize) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.input.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                true
            }
            AppEvent::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let prev = prev_boundary(&self.input, self.cursor);
                self.input.remove(prev);
                self.cursor = prev;
                true
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = prev_boundary(&self.input, self.cursor);
                false
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < self.input.len() {
                    self.cursor = self.input[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.input.len());
                }
                false
            }
            AppEvent::Nav(Direction::Up) => {
                self.highlighted = self.highlighted.saturating_sub(1);
                false
            }
            AppEvent::Nav(Direction::Down) => {
                if self.highlighted + 1 < suggestion_count {
                    self.highlighted += 1;
                }
                tracing::debug!(highlighted = self.highlighted, "autocomplete: highlight moved");
                false
            }
            _ => false,
        }
    }

    /// Keep the highlight inside a freshly replaced suggestion list.
    pub fn clamp_highlight(&mut self, suggestion_count: usize) {
        if self.highlighted >= suggestion_count {
            self.highlighted = suggestion_count.saturating_sub(1);
        }
    }
}

fn prev_boundary(s: &str, cursor: usize) -> usize {
    s[..cursor].char_indices().last().map(|(i, _)| i).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Input widget
// ---------------------------------------------------------------------------

pub struct SearchInput<'a> {
    state: &'a AutocompleteState,
    status: &'a SearchStatus,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SearchInput<'a> {
    pub fn new(
        state: &'a AutocompleteState,
        status: &'a SearchStatus,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self { state, status, focused, theme }
    }

    /// Absolute terminal position of the text cursor inside `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let col = self.state.input[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        (x, area.y + 1)
    }
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let status_style = match self.status {
            SearchStatus::Unavailable(_) => self.theme.status_error,
            _ => self.theme.status_info,
        };
        let block = Block::bordered()
            .title(" Diagnosis search ")
            .title_bottom(Line::from(Span::styled(format!(" {} ", self.status), status_style)).right_aligned())
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.state.input.is_empty() && !self.focused {
            Line::from(Span::styled("press / to search diagnoses", self.theme.row_placeholder))
        } else {
            Line::from(self.state.input.as_str())
        };
        Paragraph::new(line).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Popup widget
// ---------------------------------------------------------------------------

/// Floating suggestion list. Each entry shows the display name and, dimmed,
/// its code summary.
pub struct SuggestionPopup<'a> {
    suggestions: &'a [Suggestion],
    highlighted: usize,
    theme: &'a Theme,
}

impl<'a> SuggestionPopup<'a> {
    pub fn new(suggestions: &'a [Suggestion], highlighted: usize, theme: &'a Theme) -> Self {
        Self { suggestions, highlighted, theme }
    }

    /// The popup's rectangle, stacked directly above `anchor` and clipped to
    /// `bounds`.
    pub fn area(&self, anchor: Rect, bounds: Rect) -> Rect {
        // Remote results are uncapped; the count may not fit a u16.
        let wanted = u16::try_from(self.suggestions.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let height = wanted.min(anchor.y.saturating_sub(bounds.y));
        Rect {
            x: anchor.x,
            y: anchor.y.saturating_sub(height),
            width: anchor.width,
            height,
        }
    }
}

impl Widget for SuggestionPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 {
            return;
        }
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(format!(" {} suggestions ", self.suggestions.len()))
            .border_style(self.theme.popup_border);
        let inner = block.inner(area);
        block.render(area, buf);

        for (row, suggestion) in self.suggestions.iter().enumerate().take(inner.height as usize) {
            let y = inner.y + row as u16;
            let name_style = if row == self.highlighted {
                self.theme.popup_highlight
            } else {
                ratatui::style::Style::default()
            };
            let line = Line::from(vec![
                Span::styled(suggestion.display_name().to_string(), name_style),
                Span::raw("  "),
                Span::styled(suggestion.detail(), self.theme.row_placeholder),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
