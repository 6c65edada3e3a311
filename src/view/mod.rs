//! Terminal UI, split into layers:
//! - `theme`: the color palette and score/feedback styling helpers
//! - `panes`: rendering logic for the editor, results column, status bar
//!   and the overlay windows

pub mod panes;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::controller::{Controller, UiMode};

/// Draw one full frame: editor and results side by side, status bar below,
/// then any overlay for the current mode, then notices on top.
pub fn render(frame: &mut Frame, app: &mut Controller) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[0]);

    panes::render_editor(frame, columns[0], app);
    panes::render_results(frame, columns[1], app);
    panes::render_status_bar(frame, rows[1], app);

    match app.mode {
        UiMode::Edit => {}
        UiMode::OpenPrompt => panes::render_open_prompt(frame, app),
        UiMode::ExamplePicker => panes::render_example_picker(frame, app),
    }

    panes::render_notices(frame, app);
}
