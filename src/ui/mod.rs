mod form;
mod help;
mod preview;

use crate::app::{App, View};
use ratatui::Frame;

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    match app.view {
        View::Form => form::render(app, frame),
        View::Preview => preview::render(app, frame),
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}
