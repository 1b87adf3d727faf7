//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! - Header: brand, navigation chrome and actions (protected screens only)
//! - Body: the active screen, or the sign-in/sign-up form
//! - Footer: key hints and the current notice
//!
//! Rendering reads the app state only. Access decisions are made by
//! [`App::settle`](super::app::App::settle) before the frame is drawn.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{App, Field, Notice};
use crate::access::{Chrome, ChromeAction, Resolution, Route};

const BRAND: &str = "StoryPlatform";

/// Render the TUI based on current application state.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    match app.view() {
        Resolution::Render { route, chrome } => {
            render_header(frame, chrome.as_ref(), chunks[0]);
            render_screen(frame, app, route, chunks[1]);
        }
        Resolution::Redirect { to, .. } => {
            render_header(frame, None, chunks[0]);
            render_message(frame, &format!("Redirecting to {}...", to), chunks[1]);
        }
        Resolution::NotFound { path } => {
            render_header(frame, None, chunks[0]);
            render_message(frame, &format!("Nothing lives at {}", path), chunks[1]);
        }
    }

    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, chrome: Option<&Chrome>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(BRAND);

    let Some(chrome) = chrome else {
        frame.render_widget(block, area);
        return;
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(32)])
        .split(block.inner(area));
    frame.render_widget(block, area);

    let titles: Vec<Line> = chrome.nav.iter().map(|item| Line::from(item.label)).collect();
    let mut tabs = Tabs::new(titles)
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider("|");
    if let Some(index) = chrome.nav.iter().position(|item| item.active) {
        tabs = tabs.select(index);
    }
    frame.render_widget(tabs, halves[0]);

    let actions: Vec<Span> = chrome
        .actions
        .iter()
        .map(|action| {
            let key = match action {
                ChromeAction::WriteStory => "w",
                ChromeAction::SignOut => "o",
            };
            Span::raw(format!("[{}] {}  ", key, action.label()))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(actions)).alignment(Alignment::Right),
        halves[1],
    );
}

fn render_screen(frame: &mut Frame, app: &App, route: Route, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(route.title());
    let lines: Vec<Line> = match route {
        Route::Login | Route::Register => {
            return render_form(frame, app, route, area);
        }
        Route::Dashboard => vec![
            Line::from("Manage and share your personal library."),
            Line::from(""),
            Line::from("Press [w] to start a new story."),
        ],
        Route::Feed => vec![Line::from("Public stories from every author.")],
        Route::Create => vec![
            Line::from("Draft - Unsaved changes"),
            Line::from(""),
            Line::from("Give your story a title and some content, then publish."),
        ],
        Route::Admin => vec![
            Line::from(Span::styled(
                "Restricted Access",
                Style::default().fg(Color::Green),
            )),
            Line::from(""),
            Line::from("Login History"),
        ],
    };
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_form(frame: &mut Frame, app: &App, route: Route, area: Rect) {
    let form = app.form();
    let (subtitle, submit, switch) = match route {
        Route::Register => (
            "Start your journey as a creator today.",
            "Create Account",
            "Already have an account? Ctrl+R to sign in",
        ),
        _ => (
            "Enter your credentials to access your workspace.",
            "Sign In",
            "Don't have an account? Ctrl+R to create one",
        ),
    };

    let field_style = |field: Field| {
        if form.focus() == field {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let masked = "*".repeat(form.password().chars().count());

    let lines = vec![
        Line::from(subtitle),
        Line::from(""),
        Line::from(vec![
            Span::styled("Email:    ", field_style(Field::Email)),
            Span::raw(form.email()),
        ]),
        Line::from(vec![
            Span::styled("Password: ", field_style(Field::Password)),
            Span::raw(masked),
        ]),
        Line::from(""),
        Line::from(format!("[Enter] {}", submit)),
        Line::from(switch),
    ];

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title(route.title())),
        area,
    );
}

fn render_message(frame: &mut Frame, message: &str, area: Rect) {
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = if app.is_form_screen() {
        "Tab: next field | Enter: submit | Ctrl+R: switch form | Esc: quit"
    } else {
        "Tab/h/l: navigate | d/f/w/a: open | o: sign out | x: dismiss | q: quit"
    };

    let line = match app.notice() {
        Some(Notice::Error(text)) => Line::from(Span::styled(
            text.as_str(),
            Style::default().fg(Color::Red),
        )),
        Some(notice @ Notice::Info(_)) => Line::from(Span::styled(
            notice.text(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(hints),
    };

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}
