//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};

use super::state::{App, AppMode, FlashKind, InputField};
use crate::controller::QuoteView;
use crate::storage::KeyValueStore;
use components::{render_dialog_framework, render_input_widget};
use layouts::centered_rect;

/// 渲染 UI
pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 分类
            Constraint::Min(6),    // 名言
            Constraint::Length(3), // 统计
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_categories(frame, app, chunks[1]);
    render_quote(frame, &app.current, chunks[2]);
    render_stats(frame, app, chunks[3]);
    render_help(frame, app, chunks[4]);

    // 渲染弹窗
    match &app.mode {
        AppMode::AddingQuote => render_add_dialog(frame, app),
        AppMode::Importing => render_import_dialog(frame, app),
        AppMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("💬 Quote Generator")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_categories<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let tabs = Tabs::new(app.controller.category_options())
        .select(app.selected_option_index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .block(Block::default().title("Category").borders(Borders::ALL));
    frame.render_widget(tabs, area);
}

fn render_quote(frame: &mut Frame, view: &QuoteView, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            view.display_text(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];
    if let Some(label) = view.category_label() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(label, Style::default().fg(Color::Green))));
    }

    let quote = Paragraph::new(lines)
        .block(Block::default().title("Quote").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(quote, area);
}

fn render_stats<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let quotes = app.controller.quotes();
    let text = format!(
        "{} quotes  {} categories  export: {}",
        quotes.len(),
        quotes.categories().len(),
        app.export_path.display()
    );

    let stats = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(stats, area);
}

fn render_help<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => {
            "[n] New quote  [h/l] Category  [a] Add  [e] Export  [i] Import  [q] Quit"
        }
        AppMode::AddingQuote => match app.input_field {
            InputField::Text => "Type the quote, [Enter] next  [Esc] cancel",
            InputField::Category => "Type a category (optional), [Enter] add  [Esc] cancel",
        },
        AppMode::Importing => "[Enter] import  [Esc] cancel",
    };

    let mut spans = vec![Span::raw(help_text)];
    if let Some(flash) = &app.flash {
        let color = match flash.kind {
            FlashKind::Success => Color::Green,
            FlashKind::Error => Color::Red,
        };
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(flash.text.as_str(), Style::default().fg(color)));
    }

    let help = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_add_dialog<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let area = centered_rect(60, 50, frame.area());
    let inner = render_dialog_framework(frame, area, "Add Quote");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    // 名言输入
    let is_text_active = app.input_field == InputField::Text;
    let text_val = if is_text_active {
        &app.input_buffer
    } else {
        &app.temp_text
    };
    render_input_widget(frame, chunks[0], "Quote", text_val, is_text_active, Color::Yellow);

    // 分类输入
    let is_category_active = app.input_field == InputField::Category;
    let category_val = if is_category_active {
        &app.input_buffer
    } else {
        ""
    };
    render_input_widget(
        frame,
        chunks[1],
        "Category (optional)",
        category_val,
        is_category_active,
        Color::Yellow,
    );

    let hint = match app.input_field {
        InputField::Text => "Press Enter to continue",
        InputField::Category => "Press Enter to add (blank means general)",
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::Gray)),
        chunks[2],
    );
}

fn render_import_dialog<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let area = centered_rect(70, 30, frame.area());
    let inner = render_dialog_framework(frame, area, "Import Quotes");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    render_input_widget(
        frame,
        chunks[0],
        "JSON file",
        &app.input_buffer,
        true,
        Color::Yellow,
    );

    let hint = Paragraph::new("Replaces all quotes. Enter to import, Esc to cancel")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[1]);
}
