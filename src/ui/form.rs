use crate::app::{App, FocusTarget, InputMode};
use crate::draft::Section;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + body(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let modified = if app.controller.modified() {
        Span::styled(" ● modified", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ○ unchanged", Style::default().fg(Color::DarkGray))
    };
    let mut header_spans = vec![
        Span::styled(
            " Resume Forge ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" [{}]", app.controller.section().label()),
            Style::default().fg(Color::White),
        ),
        modified,
    ];
    if app.controller.preview_visible() {
        header_spans.push(Span::styled(
            "  preview ready (g)",
            Style::default().fg(Color::Green),
        ));
    }
    let header_line = Line::from(header_spans);
    let header = Paragraph::new(header_line).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    // ── Body: sidebar + fields ──
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(20)])
        .split(chunks[1]);

    render_sidebar(app, frame, body[0]);
    render_fields(app, frame, body[1]);

    // ── Status bar ──
    let status_line = Line::from(vec![
        key(" ↑↓"),
        Span::raw(" Field  "),
        key("Enter"),
        Span::raw(" Edit  "),
        key("a"),
        Span::raw(" Add  "),
        key("d"),
        Span::raw(" Del  "),
        key("←→"),
        Span::raw(" Section  "),
        key("g"),
        Span::raw(" Generate  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[2]);
}

fn key(label: &str) -> Span<'_> {
    Span::styled(
        label,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_sidebar(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    use crate::draft::Collection;

    let active = app.controller.section();
    let mut lines = vec![Line::from("")];
    for (i, section) in Section::ALL.iter().enumerate() {
        let (marker, style) = if *section == active {
            (
                "▸ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  ", Style::default().fg(Color::DarkGray))
        };
        let count = match section {
            Section::Personal => String::new(),
            Section::Experience => {
                format!(" ({})", app.controller.entry_count(Collection::Experience))
            }
            Section::Education => {
                format!(" ({})", app.controller.entry_count(Collection::Education))
            }
            Section::Skills => format!(" ({})", app.controller.entry_count(Collection::Skills)),
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{} ", i + 1), style),
            Span::styled(section.label(), style),
            Span::styled(count, Style::default().fg(Color::DarkGray)),
        ]));
    }

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Sections [1-4] "),
    );
    frame.render_widget(sidebar, area);
}

/// Label shown in front of a focusable row.
fn row_label(target: FocusTarget) -> String {
    match target {
        FocusTarget::Scalar(field) => field.label().to_string(),
        FocusTarget::PortraitPath => "Portrait file".to_string(),
        FocusTarget::Entry(at) => {
            use crate::draft::EntryRef::*;
            match at {
                Experience(i, f) => format!("{} {}", f.label(), i + 1),
                Education(i, f) => format!("{} {}", f.label(), i + 1),
                Skill(i) => format!("Skill {}", i + 1),
            }
        }
    }
}

/// Current display value of a row.
fn row_value(app: &App, target: FocusTarget, editing: bool) -> String {
    match target {
        FocusTarget::Scalar(field) => app.controller.draft().scalar(field).to_string(),
        FocusTarget::PortraitPath => {
            if editing {
                app.path_buffer.clone()
            } else {
                app.controller
                    .draft()
                    .image
                    .as_ref()
                    .map(|i| i.source.display().to_string())
                    .unwrap_or_else(|| "(none)".to_string())
            }
        }
        FocusTarget::Entry(at) => app.controller.draft().entry(at).to_string(),
    }
}

fn render_fields(app: &App, frame: &mut Frame, area: ratatui::layout::Rect) {
    let targets = app.focus_targets();
    let scroll = app.form_scroll as usize;

    let mut lines: Vec<Line> = Vec::new();
    if targets.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No entries yet. Press a to add one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (row, target) in targets.iter().enumerate().skip(scroll) {
        let focused = row == app.focus;
        let editing = focused && app.input_mode == InputMode::Editing;

        let marker = if focused { "▸ " } else { "  " };
        let label_style = if editing {
            Style::default().fg(Color::Yellow)
        } else if focused {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value_style = if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{}: ", row_label(*target)), label_style),
            Span::styled(row_value(app, *target, editing), value_style),
        ]));
    }

    let title = format!(" {} ", app.controller.section().label());
    let hint = if app.input_mode == InputMode::Editing {
        " Enter apply · Esc cancel "
    } else {
        " Enter to edit "
    };
    let fields = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_bottom(
                Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
                    .alignment(Alignment::Right),
            ),
    );
    frame.render_widget(fields, area);

    // Place the cursor at the end of the value being edited.
    if app.input_mode == InputMode::Editing {
        if let Some(target) = app.focused() {
            let prefix = format!("▸ {}: ", row_label(target));
            let value = row_value(app, target, true);
            let cursor_x = area.x + 1 + prefix.width() as u16 + value.width() as u16;
            let cursor_y = area.y + 1 + (app.focus.saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}
