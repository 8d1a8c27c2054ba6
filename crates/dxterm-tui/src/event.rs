//! Semantic application events: crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! | Key(s)            | Event            |
//! |-------------------|------------------|
//! | `q`, `Ctrl+c`     | `Quit`           |
//! | `Tab`             | `FocusNext`      |
//! | `/`               | `SearchFocus`    |
//! | `↑` / `k`         | `Nav(Up)`        |
//! | `↓` / `j`         | `Nav(Down)`      |
//! | `a`               | `AddRow`         |
//! | `d`               | `RemoveRow`      |
//! | printable char    | `Char(c)`        |
//! | `Backspace`       | `Backspace`      |
//! | `Enter`           | `Enter`          |
//! | `Esc`             | `Escape`         |
//! | terminal resize   | `Resize(w, h)`   |
//!
//! ## Insert mode
//!
//! While the diagnosis search or the command bar has focus the loop calls
//! [`to_app_event_insert`]: every printable key types its character, arrow
//! keys still navigate, and only `Ctrl+c`, `Tab`, `Esc`, `Enter` and
//! `Backspace` keep special bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Cycle focus between the diagnosis list and the search input.
    FocusNext,
    /// Jump straight into the diagnosis search input.
    SearchFocus,
    /// Move within the focused widget: rows, suggestions or the text cursor.
    Nav(Direction),
    /// Append a blank diagnosis row.
    AddRow,
    /// Remove the selected diagnosis row.
    RemoveRow,
    Char(char),
    Backspace,
    /// Commit the highlighted suggestion, or enter the search from the list.
    Enter,
    Resize(u16, u16),
    /// Leave the search input (blur) or dismiss a modal.
    Escape,
}

/// Map a raw crossterm [`Event`] in normal (navigation) mode.
///
/// Returns `None` for mouse events and unbound keys.
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] while a text input has focus.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),
        Char('/') if key.modifiers == Mod::NONE => Some(AppEvent::SearchFocus),

        Char('a') if key.modifiers == Mod::NONE => Some(AppEvent::AddRow),
        Char('d') if key.modifiers == Mod::NONE => Some(AppEvent::RemoveRow),

        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Down)),
        Left if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Left)),
        Right if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Right)),

        // `?` and `:` arrive here; the app shell interprets them
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
