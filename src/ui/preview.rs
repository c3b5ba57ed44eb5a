use crate::app::App;
use crate::render::{Portrait, ResumeDocument};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let doc = ResumeDocument::project(app.controller.draft());

    // Layout: content(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let content = Paragraph::new(document_lines(&doc))
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Resume Preview ")
                .title_bottom(
                    Line::from(format!(" scroll: {} ", app.preview_scroll))
                        .alignment(Alignment::Right),
                ),
        );
    frame.render_widget(content, chunks[0]);

    // ── Status bar ──
    let status_line = Line::from(vec![
        Span::styled(
            " ↑↓/PgUp/PgDn",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Scroll  "),
        Span::styled(
            "p",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Print  "),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Back  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[1]);
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn document_lines(doc: &ResumeDocument) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    let portrait = match &doc.portrait {
        Portrait::Image(image) => format!("[portrait: {}]", image.source.display()),
        Portrait::Placeholder => "[no portrait]".to_string(),
    };
    lines.push(Line::from(Span::styled(
        portrait,
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        doc.name.clone(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        doc.title.clone(),
        Style::default().fg(Color::White),
    )));
    lines.push(Line::from(vec![
        Span::styled("Email: ", Style::default().fg(Color::DarkGray)),
        Span::raw(doc.email.clone()),
        Span::raw("   "),
        Span::styled("Phone: ", Style::default().fg(Color::DarkGray)),
        Span::raw(doc.phone.clone()),
    ]));

    lines.push(Line::from(""));
    lines.push(heading("Professional Summary"));
    for text in doc.summary.lines() {
        lines.push(Line::from(text.to_string()));
    }

    lines.push(Line::from(""));
    lines.push(heading("Work Experience"));
    for exp in &doc.experience {
        lines.push(Line::from(vec![
            Span::styled(
                exp.position.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", exp.company),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        for text in exp.description.lines() {
            lines.push(Line::from(format!("  • {text}")));
        }
        lines.push(Line::from(""));
    }

    lines.push(heading("Education"));
    for edu in &doc.education {
        lines.push(Line::from(vec![
            Span::styled(
                edu.degree.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", edu.institution),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        lines.push(Line::from(format!(
            "  Graduated: {}   GPA: {}",
            edu.year, edu.gpa
        )));
        lines.push(Line::from(""));
    }

    lines.push(heading("Skills"));
    lines.push(Line::from(doc.skills.join("  ·  ")));

    lines
}
