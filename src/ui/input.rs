//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode};
use crate::storage::KeyValueStore;

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('n') | KeyCode::Char(' ') | KeyCode::Enter => Some(Action::NextQuote),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevCategory),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Action::NextCategory),
            KeyCode::Char('a') => Some(Action::StartAddQuote),
            KeyCode::Char('i') => Some(Action::StartImport),
            KeyCode::Char('e') => Some(Action::Export),
            _ => None,
        },
        AppMode::AddingQuote | AppMode::Importing => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
    }
}

/// 处理按键事件，返回 true 表示退出
pub fn handle_key_event<S: KeyValueStore>(app: &mut App<S>, key: KeyCode) -> bool {
    match get_action(&app.mode, key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}
