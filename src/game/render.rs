//! Rendering: panels per tab, click-target registration, number formatting.
//!
//! All visual formatting lives here; the engine only hands over state
//! snapshots and next-purchase costs.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

use super::modes;
use super::save::KvStore;
use super::state::{Tab, UpgradeId};
use super::{AdminField, App, EntryMode, Intent};

const BUTTON_ART: &[&str] = &[
    "╭──────────────╮",
    "│              │",
    "│              │",
    "╰──────────────╯",
];

pub fn render<S: KvStore>(
    app: &App<S>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState<Intent>>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(1), // tab bar
            Constraint::Min(8),    // panel
            Constraint::Length(3), // message + hints
        ])
        .split(area);

    render_header(app, f, chunks[0]);
    render_tab_bar(app, f, chunks[1], click_state);

    let mut cs = click_state.borrow_mut();
    match app.engine.state().active_tab {
        Tab::Clicker => render_clicker(app, f, chunks[2], &mut cs),
        Tab::Shop => render_shop(app, f, chunks[2], &mut cs),
        Tab::Stats => render_stats(app, f, chunks[2]),
        Tab::Codes => render_codes(app, f, chunks[2]),
        Tab::Admin => render_admin(app, f, chunks[2], &mut cs),
    }
    drop(cs);

    render_footer(app, f, chunks[3]);
}

fn render_header<S: KvStore>(app: &App<S>, f: &mut Frame, area: Rect) {
    let state = app.engine.state();
    let spec = modes::spec(app.engine.mode());

    let lines = vec![
        Line::from(Span::styled(
            spec.title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} {}", format_number(state.currency), spec.currency_name),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{}/press   {}/sec",
                format_number(state.per_click),
                format_number(state.per_second)
            ),
            Style::default().fg(Color::Gray),
        )),
    ];

    let header = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(ratzilla::ratatui::layout::Alignment::Center);
    f.render_widget(header, area);
}

fn render_tab_bar<S: KvStore>(
    app: &App<S>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState<Intent>>>,
) {
    let state = app.engine.state();
    let active = state.active_tab;

    let mut tabs: Vec<(Tab, &str)> = vec![
        (Tab::Clicker, "[G] Game"),
        (Tab::Shop, "[S] Shop"),
        (Tab::Stats, "[T] Stats"),
        (Tab::Codes, "[O] Codes"),
    ];
    if state.admin_unlocked {
        tabs.push((Tab::Admin, "[A] Admin"));
    }

    let separator = "│";
    let sep_width = Line::from(separator).width() as u16;
    let mut spans: Vec<Span> = Vec::new();
    let mut widths: Vec<(u16, Intent)> = Vec::new();

    for (i, (tab, label)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(separator, Style::default().fg(Color::DarkGray)));
        }
        let padded = format!(" {label} ");
        let style = if *tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        widths.push((Line::from(padded.as_str()).width() as u16, Intent::ShowTab(*tab)));
        spans.push(Span::styled(padded, style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);

    let mut cs = click_state.borrow_mut();
    cs.add_tab_targets(&widths, sep_width, area.x, area.y, area.width, area.height);
}

fn render_clicker<S: KvStore>(
    app: &App<S>,
    f: &mut Frame,
    area: Rect,
    cs: &mut ClickState<Intent>,
) {
    let spec = modes::spec(app.engine.mode());
    let mut lines: Vec<Line> = vec![Line::from("")];

    for (i, row) in BUTTON_ART.iter().enumerate() {
        let text = if i == BUTTON_ART.len() / 2 {
            // Center the label inside the box.
            let inner = BUTTON_ART[0].chars().count() - 2;
            format!("│{:^width$}│", spec.button_label, width = inner)
        } else {
            row.to_string()
        };
        lines.push(Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[C] or tap the button",
        Style::default().fg(Color::DarkGray),
    )));

    let next = app.next_mode();
    let switch_row = if next != app.engine.mode() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[M] Enter {}", modes::spec(next).title),
            Style::default().fg(Color::Magenta),
        )));
        Some(lines.len() as u16 - 1)
    } else {
        None
    };

    let panel = Paragraph::new(lines)
        .alignment(ratzilla::ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);

    // The button art (plus a row of padding either side) is one big target.
    let button_top = area.y + 1;
    cs.add_target(
        Rect::new(
            area.x,
            button_top.saturating_sub(1),
            area.width,
            BUTTON_ART.len() as u16 + 2,
        ),
        Intent::PressButton,
    );
    if let Some(offset) = switch_row {
        cs.add_row_target(area, area.y + offset, Intent::SwitchMode(next));
    }
}

fn render_shop<S: KvStore>(app: &App<S>, f: &mut Frame, area: Rect, cs: &mut ClickState<Intent>) {
    let state = app.engine.state();
    let mode = app.engine.mode();
    let spec = modes::spec(mode);

    let mut lines: Vec<Line> = Vec::new();
    for (i, &id) in UpgradeId::all().iter().enumerate() {
        let Some(flavor) = modes::flavor(mode, id) else {
            continue;
        };
        let cost = app.engine.next_cost_of(id);
        let affordable = state.currency >= cost as f64;
        let gain = if flavor.per_click_bonus != 0.0 {
            format!("+{}/press", format_number(flavor.per_click_bonus))
        } else {
            format!("+{}/sec", format_number(flavor.per_second_bonus))
        };
        let style = if affordable {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(format!("[{}] ", i + 1), style.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(
                    "{:<16} lv {:<4} {:<10} {} {}",
                    flavor.name,
                    state.level_of(id),
                    gain,
                    format_number(cost as f64),
                    spec.currency_name
                ),
                style,
            ),
        ]);
        lines.push(line);
        cs.add_row_target(area, area.y + i as u16, Intent::Buy(id));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_stats<S: KvStore>(app: &App<S>, f: &mut Frame, area: Rect) {
    let state = app.engine.state();
    let mode = app.engine.mode();
    let spec = modes::spec(mode);

    let pin = |overridden: bool| if overridden { " (pinned)" } else { "" };
    let mut lines = vec![
        Line::from(format!(
            "lifetime earned   {} {}",
            format_number(state.total_earned),
            spec.currency_name
        )),
        Line::from(format!(
            "current balance   {} {}",
            format_number(state.currency),
            spec.currency_name
        )),
        Line::from(format!(
            "per press         {}{}",
            format_number(state.per_click),
            pin(state.per_click_overridden)
        )),
        Line::from(format!(
            "per second        {}{}",
            format_number(state.per_second),
            pin(state.per_second_overridden)
        )),
        Line::from(""),
    ];
    for u in &state.upgrades {
        if let Some(flavor) = modes::flavor(mode, u.id) {
            lines.push(Line::from(format!("{:<16} lv {}", flavor.name, u.level)));
        }
    }

    f.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::Gray)),
        area,
    );
}

fn render_codes<S: KvStore>(app: &App<S>, f: &mut Frame, area: Rect) {
    let focused = app.ui.entry == EntryMode::Code;
    let entry = if focused {
        format!("> {}_", app.ui.buffer)
    } else {
        "> (press O to focus)".to_string()
    };
    let lines = vec![
        Line::from("Heard a secret code? Type it here."),
        Line::from(""),
        Line::from(Span::styled(
            entry,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] redeem   [Esc] back to shortcuts",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_admin<S: KvStore>(app: &App<S>, f: &mut Frame, area: Rect, cs: &mut ClickState<Intent>) {
    let state = app.engine.state();
    let mode = app.engine.mode();

    let editing = match app.ui.entry {
        EntryMode::AdminValue(field) => Some(field),
        _ => None,
    };

    let mut rows: Vec<(AdminField, String, String)> = vec![
        (
            AdminField::Currency,
            "balance".into(),
            format_number(state.currency),
        ),
        (
            AdminField::PerClick,
            "per press".into(),
            format_number(state.per_click),
        ),
        (
            AdminField::PerSecond,
            "per second".into(),
            format_number(state.per_second),
        ),
    ];
    for &id in UpgradeId::all() {
        if let Some(flavor) = modes::flavor(mode, id) {
            rows.push((
                AdminField::Level(id),
                format!("{} level", flavor.name),
                state.level_of(id).to_string(),
            ));
        }
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, (field, label, value)) in rows.iter().enumerate() {
        let shown = if editing == Some(*field) {
            format!("{:<22} {}_", label, app.ui.buffer)
        } else {
            format!("{:<22} {}", label, value)
        };
        let style = if editing == Some(*field) {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(shown, style)));
        cs.add_row_target(area, area.y + i as u16, Intent::EditAdminField(*field));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[R] wipe all progress (no undo)",
        Style::default().fg(Color::Red),
    )));
    cs.add_row_target(area, area.y + rows.len() as u16 + 1, Intent::ResetAll);

    lines.push(Line::from(Span::styled(
        "tap a row, type a value, [Enter] to apply",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Paragraph::new(lines), area);
}

fn render_footer<S: KvStore>(app: &App<S>, f: &mut Frame, area: Rect) {
    let message = app.ui.message.as_deref().unwrap_or("");
    let lines = vec![
        Line::from(Span::styled(
            message,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "[C] press  [1-4] buy  [G/S/T/O] tabs  [M] mode",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let footer = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(ratzilla::ratatui::layout::Alignment::Center);
    f.render_widget(footer, area);
}

/// Thousands-separated display of a (possibly fractional) amount.
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let digits = int_part.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if frac > 0.05 {
        format!("{}.{}", grouped, (frac * 10.0).round() as u8)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_234.0), "1,234");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
    }

    #[test]
    fn format_number_keeps_single_decimal() {
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.6), "0.6");
    }

    #[test]
    fn format_number_negative() {
        assert_eq!(format_number(-1234.0), "-1,234");
    }
}
