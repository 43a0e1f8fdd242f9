use crate::app::{App, InputMode};
use chrono::Local;
use crossterm::event::{self, Event as CEvent};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use crate::parser;

fn centered_rect_absolute(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length((r.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((r.width.saturating_sub(width) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

/// The checklist panel, at the persisted offset clamped into view.
fn panel_rect(app: &App, area: Rect) -> Rect {
    let longest = app
        .list
        .tasks()
        .iter()
        .map(|task| task.name.chars().count())
        .max()
        .unwrap_or(18) as u16;
    let width = (longest + 16).min(area.width);
    let height = (app.list.len().max(1) as u16 + 2).min(area.height);
    let x = (app.position.x.max(0) as u16).min(area.width.saturating_sub(width));
    let y = (app.position.y.max(0) as u16).min(area.height.saturating_sub(height));
    Rect::new(area.x + x, area.y + y, width, height)
}

fn get_legend(input_mode: &InputMode) -> Text<'static> {
    match input_mode {
        InputMode::Normal => Text::from(Line::from(vec![
            Span::styled(" q ", Style::default().fg(Color::Red)),
            Span::raw(": Quit "),
            Span::styled(" j ", Style::default().fg(Color::Red)),
            Span::raw(": Down "),
            Span::styled(" k ", Style::default().fg(Color::Red)),
            Span::raw(": Up "),
            Span::styled(" Space ", Style::default().fg(Color::Red)),
            Span::raw(": Toggle "),
            Span::styled(" a ", Style::default().fg(Color::Red)),
            Span::raw(": All Done "),
            Span::styled(" e ", Style::default().fg(Color::Red)),
            Span::raw(": Reset Time "),
            Span::styled(" Arrows ", Style::default().fg(Color::Red)),
            Span::raw(": Move Panel "),
        ])),
        InputMode::EditTime => Text::from(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Red)),
            Span::raw(": Save "),
            Span::styled(" Esc ", Style::default().fg(Color::Red)),
            Span::raw(": Cancel "),
        ])),
    }
}

fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Split the main layout into body and footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(size);
    let body = chunks[0];
    let footer = chunks[1];

    let panel = panel_rect(app, body);
    f.render_widget(Clear, panel);

    let block = Block::default().borders(Borders::ALL).title("Daily Tasks");
    if app.list.is_empty() {
        let empty = Paragraph::new("No tasks configured").block(block);
        f.render_widget(empty, panel);
    } else {
        // Borders plus the highlight symbol column.
        let inner_width = panel.width.saturating_sub(5) as usize;
        let items: Vec<ListItem> = app
            .list
            .tasks()
            .iter()
            .map(|task| {
                let time = parser::format_reset_time(task.reset_time);
                let mark = if task.completed { "[x] " } else { "[ ] " };
                let mark_style = if task.completed {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let name_width = inner_width.saturating_sub(mark.len() + time.len() + 1);
                ListItem::new(Line::from(vec![
                    Span::styled(mark, mark_style),
                    Span::raw(format!("{:<width$} ", task.name, width = name_width)),
                    Span::styled(time, Style::default().fg(Color::Yellow)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, panel, &mut app.state);
    }

    if let InputMode::EditTime = app.input_mode {
        let popup_block = Block::default()
            .title("Reset Time (HH:MM)")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Green));

        let popup_area = centered_rect_absolute(24, 3, body);
        let input = Paragraph::new(app.time_input.as_str())
            .style(Style::default().fg(Color::White))
            .block(popup_block);

        f.render_widget(Clear, popup_area);
        f.render_widget(input, popup_area);
    }

    // Render the legend in the footer
    let legend = Paragraph::new(get_legend(&app.input_mode))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(legend, footer);
}

// Main event loop: draw, run the periodic evaluation, handle input. The
// wall clock is read here and passed down; the model never reads one.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
) -> io::Result<App> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        if last_tick.elapsed() >= tick_rate {
            app.tick(Local::now().naive_local());
            last_tick = Instant::now();
        }

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                let should_quit = app.handle_input(key, Local::now().naive_local())?;
                if should_quit {
                    return Ok(app);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReminderList, TaskRecord};
    use crate::storage::WindowPosition;
    use std::path::PathBuf;

    fn test_app(x: i32, y: i32) -> App {
        let list = ReminderList::new(vec![
            TaskRecord::new("Water plants"),
            TaskRecord::new("Stretch"),
        ]);
        App::new(
            list,
            WindowPosition { x, y },
            PathBuf::from("unused.json"),
        )
    }

    #[test]
    fn panel_stays_inside_the_area() {
        let app = test_app(500, 500);
        let area = Rect::new(0, 0, 80, 24);
        let panel = panel_rect(&app, area);
        assert!(panel.x + panel.width <= area.width);
        assert!(panel.y + panel.height <= area.height);
    }

    #[test]
    fn panel_sits_at_the_stored_offset_when_it_fits() {
        let app = test_app(5, 3);
        let panel = panel_rect(&app, Rect::new(0, 0, 80, 24));
        assert_eq!((panel.x, panel.y), (5, 3));
        assert_eq!(panel.height, 4);
    }

    #[test]
    fn panel_shrinks_to_a_small_terminal() {
        let app = test_app(0, 0);
        let area = Rect::new(0, 0, 10, 3);
        let panel = panel_rect(&app, area);
        assert!(panel.width <= 10);
        assert!(panel.height <= 3);
    }
}
