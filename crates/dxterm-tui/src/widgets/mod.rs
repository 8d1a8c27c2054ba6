//! Ratatui widgets for the dxterm TUI.

pub mod autocomplete;
pub mod command_bar;
pub mod diagnosis_list;
pub mod header;
pub mod help;
