//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use std::path::PathBuf;

use chrono::{DateTime, Duration, Local};

use crate::config::{Config, DEFAULT_FLASH_SECONDS};
use crate::controller::{QuoteController, QuoteView};
use crate::storage::KeyValueStore;

/// 应用状态
pub struct App<S: KeyValueStore> {
    pub controller: QuoteController<S>,
    pub current: QuoteView,
    pub mode: AppMode,
    pub input_buffer: String,
    pub input_field: InputField,
    pub temp_text: String, // 输入分类时暂存的名言文本
    pub flash: Option<Flash>,
    pub flash_duration: Duration,
    pub export_path: PathBuf,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    AddingQuote,
    Importing,
}

/// 输入字段类型
#[derive(Debug, Clone, PartialEq)]
pub enum InputField {
    Text,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashKind {
    Success,
    Error,
}

/// 状态栏中的临时提示
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub text: String,
    pub kind: FlashKind,
    pub shown_at: DateTime<Local>,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FlashKind::Success,
            shown_at: Local::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FlashKind::Error,
            shown_at: Local::now(),
        }
    }

    /// 错误提示不会自动消失
    pub fn is_expired(&self, now: DateTime<Local>, lifetime: Duration) -> bool {
        self.kind == FlashKind::Success && now - self.shown_at >= lifetime
    }
}

/// 提示显示时长；超出范围时回退为默认值
fn flash_lifetime(seconds: i64) -> Duration {
    Duration::try_seconds(seconds.max(0)).unwrap_or_else(|| {
        tracing::warn!("flash_seconds {} is out of range, using {}", seconds, DEFAULT_FLASH_SECONDS);
        Duration::seconds(DEFAULT_FLASH_SECONDS)
    })
}

impl<S: KeyValueStore> App<S> {
    /// 创建新的应用实例，并抽取第一条名言
    pub fn new(mut controller: QuoteController<S>, config: &Config) -> Self {
        let current = controller.pick();
        Self {
            controller,
            current,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            input_field: InputField::Text,
            temp_text: String::new(),
            flash: None,
            flash_duration: flash_lifetime(config.flash_seconds),
            export_path: config.export_path(),
        }
    }

    /// 当前分类在选项列表中的位置
    pub fn selected_option_index(&self) -> usize {
        let selected = self.controller.selected_category();
        self.controller
            .category_options()
            .iter()
            .position(|c| c == selected)
            .unwrap_or(0)
    }
}
