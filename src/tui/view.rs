//! Screen layout and panels

use chrono::{DateTime, Local};
use ratatui::{
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph, Wrap},
};

use crate::dashboard::Dashboard;
use crate::exercises::ExerciseKind;
use crate::shortcuts;

use super::form::AthleteForm;

const ACCENT: Color = Color::Cyan;

/// Draw the whole dashboard, with the athlete form on top when open
pub fn draw(frame: &mut Frame, dashboard: &Dashboard, form: Option<&AthleteForm>, now: DateTime<Local>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], dashboard, now);
    draw_selector(frame, chunks[1], dashboard);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(chunks[2]);
    draw_exercise(frame, body[0], dashboard);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(body[1]);
    draw_metrics(frame, right[0], dashboard);
    draw_chart(frame, right[1], dashboard);

    draw_footer(frame, chunks[3], dashboard);

    if let Some(form) = form {
        draw_form(frame, form);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, dashboard: &Dashboard, now: DateTime<Local>) {
    let recording = if dashboard.is_recording() {
        Span::styled(" ● REC ", Style::default().fg(Color::White).bg(Color::Red).bold())
    } else {
        Span::styled(" ○ idle ", Style::default().fg(Color::DarkGray))
    };

    let line = Line::from(vec![
        Span::styled("posedash - Exercise Tracker", Style::default().fg(ACCENT).bold()),
        Span::raw("   "),
        Span::raw(now.format("%a %d %b %Y  %H:%M:%S").to_string()),
        Span::raw("   "),
        recording,
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_selector(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let kinds = ExerciseKind::all();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(kinds.iter().map(|_| Constraint::Ratio(1, kinds.len() as u32)))
        .split(area);

    for (kind, cell) in kinds.iter().zip(cells.iter()) {
        let active = dashboard.is_active(*kind);
        let style = if active {
            Style::default().fg(Color::Black).bg(ACCENT).bold()
        } else {
            Style::default()
        };
        let border = if active { ACCENT } else { Color::DarkGray };

        let card = Paragraph::new(format!("[{}] {}", kind.shortcut(), kind.info().name))
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)));
        frame.render_widget(card, *cell);
    }
}

fn draw_exercise(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = Block::default().borders(Borders::ALL).title("Exercise");

    let Some(info) = dashboard.exercise_info() else {
        let hint = Paragraph::new("Press 1-5 to choose an exercise")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(format!("{} {}", info.emoji, info.name), Style::default().fg(ACCENT).bold())),
        Line::from(info.description),
        Line::from(""),
        Line::from(Span::styled("Instructions", Style::default().bold())),
    ];
    lines.extend(
        info.instructions
            .iter()
            .enumerate()
            .map(|(i, step)| Line::from(format!("{}. {}", i + 1, step))),
    );

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(panel, area);
}

fn draw_metrics(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let cards = dashboard.cards();
    if cards.is_empty() {
        let empty = Paragraph::new("No metrics yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Metrics"));
        frame.render_widget(empty, area);
        return;
    }

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, cards.len() as u32)))
        .split(area);

    for (card, cell) in cards.iter().zip(cells.iter()) {
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(card.display(), Style::default().fg(Color::Yellow).bold())),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(card.label));
        frame.render_widget(widget, *cell);
    }
}

fn draw_chart(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let block = Block::default().borders(Borders::ALL).title("Progress");

    let (Some(kind), Some(series)) = (dashboard.active(), dashboard.active_trend()) else {
        frame.render_widget(block, area);
        return;
    };
    if series.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let data = series.chart_data();
    let x_max = (data.len().saturating_sub(1)).max(1) as f64;
    let y_max = series.max_value().unwrap_or(0.0).max(1.0) * 1.2;

    let x_labels: Vec<String> = match (series.iter().next(), series.latest()) {
        (Some(first), Some(last)) => vec![first.label.clone(), last.label.clone()],
        _ => vec![],
    };
    let y_labels = vec![
        "0".to_string(),
        format!("{:.0}", y_max / 2.0),
        format!("{:.0}", y_max),
    ];

    let datasets = vec![Dataset::default()
        .name(kind.trend_label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(ACCENT))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .title(kind.trend_label())
                .bounds([0.0, y_max])
                .labels(y_labels)
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let line = match dashboard.notice() {
        Some(notice) => Line::from(vec![
            Span::styled(notice.to_string(), Style::default().fg(Color::Green).bold()),
            Span::raw("  |  "),
            Span::styled(shortcuts::help_line(), Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(shortcuts::help_line(), Style::default().fg(Color::DarkGray))),
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn draw_form(frame: &mut Frame, form: &AthleteForm) {
    let area = centered(frame.area(), 50, 10);
    frame.render_widget(Clear, area);

    let mut items: Vec<ListItem> = form
        .fields()
        .map(|(label, value, focused)| {
            let marker = if focused { "> " } else { "  " };
            let cursor = if focused { "_" } else { "" };
            let style = if focused { Style::default().fg(ACCENT).bold() } else { Style::default() };
            ListItem::new(format!("{}{:<9}{}{}", marker, format!("{}:", label), value, cursor)).style(style)
        })
        .collect();
    items.push(ListItem::new(""));
    items.push(ListItem::new(Span::styled(
        "Tab: next field | Enter: save | Esc: cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Save session - athlete info")
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(list, area);
}

/// Rect of `width_pct` percent width and fixed height, centered in `area`
fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_pct.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
