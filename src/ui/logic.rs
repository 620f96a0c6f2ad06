//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::actions::Action;
use super::state::{App, AppMode, Flash, FlashKind, InputField};
use crate::controller::{AddQuoteError, ExportError};
use crate::models::ImportError;
use crate::storage::{KeyValueStore, read_text_file, write_text_file};

impl<S: KeyValueStore> App<S> {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> bool {
        // 错误提示保留到下一次按键
        if self
            .flash
            .as_ref()
            .is_some_and(|f| f.kind == FlashKind::Error)
        {
            self.flash = None;
        }

        match action {
            Action::Quit => return true,
            Action::NextQuote => self.current = self.controller.pick(),
            Action::PrevCategory => self.cycle_category(false),
            Action::NextCategory => self.cycle_category(true),

            Action::StartAddQuote => self.start_add_quote(),
            Action::StartImport => self.start_import(),
            Action::Export => self.export(),

            Action::Cancel => self.cancel(),

            Action::Submit => match self.mode {
                AppMode::AddingQuote => match self.input_field {
                    InputField::Text => self.move_to_category_input(),
                    InputField::Category => self.confirm_add_quote(),
                },
                AppMode::Importing => self.confirm_import(),
                AppMode::Normal => {}
            },

            Action::Input(c) => {
                if self.mode != AppMode::Normal {
                    self.input_buffer.push(c);
                }
            }

            Action::DeleteChar => {
                if self.mode != AppMode::Normal {
                    self.input_buffer.pop();
                }
            }
        }
        false
    }

    /// 周期性调用，清除过期的成功提示
    pub fn tick(&mut self, now: DateTime<Local>) {
        if self
            .flash
            .as_ref()
            .is_some_and(|f| f.is_expired(now, self.flash_duration))
        {
            self.flash = None;
        }
    }

    // ============ 分类过滤 ============

    fn cycle_category(&mut self, forward: bool) {
        let options = self.controller.category_options();
        let len = options.len();
        let index = self.selected_option_index();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        self.current = self.controller.select_category(&options[next]);
    }

    // ============ 添加名言 ============

    /// 开始添加名言
    pub fn start_add_quote(&mut self) {
        self.mode = AppMode::AddingQuote;
        self.input_buffer.clear();
        self.input_field = InputField::Text;
        self.temp_text.clear();
    }

    /// 切换到分类输入；文本为空白时停留在当前输入框
    pub fn move_to_category_input(&mut self) {
        if self.input_buffer.trim().is_empty() {
            self.flash = Some(Flash::error(AddQuoteError::EmptyText.to_string()));
            return;
        }
        self.temp_text = std::mem::take(&mut self.input_buffer);
        self.input_field = InputField::Category;
    }

    /// 确认添加名言
    pub fn confirm_add_quote(&mut self) {
        match self.controller.add_quote(&self.temp_text, &self.input_buffer) {
            Ok(view) => {
                self.current = view;
                self.mode = AppMode::Normal;
                self.input_buffer.clear();
                self.temp_text.clear();
                self.flash = Some(Flash::success("New quote added successfully!"));
            }
            Err(e) => {
                // 回到文本输入，保留已输入的内容
                self.input_buffer = std::mem::take(&mut self.temp_text);
                self.input_field = InputField::Text;
                self.flash = Some(Flash::error(e.to_string()));
            }
        }
    }

    // ============ 导入/导出 ============

    /// 开始导入，默认路径为导出文件
    pub fn start_import(&mut self) {
        self.mode = AppMode::Importing;
        self.input_buffer = self.export_path.display().to_string();
    }

    /// 确认导入
    pub fn confirm_import(&mut self) {
        let path = PathBuf::from(self.input_buffer.trim());
        let result = read_text_file(&path)
            .map_err(ImportError::from)
            .and_then(|contents| self.controller.import_json(&contents));

        self.mode = AppMode::Normal;
        self.input_buffer.clear();
        self.flash = Some(match result {
            Ok(view) => {
                self.current = view;
                Flash::success(format!(
                    "Imported {} quotes",
                    self.controller.quotes().len()
                ))
            }
            Err(e) => {
                tracing::warn!("Import from {} rejected: {}", path.display(), e);
                Flash::error(format!("Import failed: {}", e))
            }
        });
    }

    /// 导出到配置的 quotes.json
    pub fn export(&mut self) {
        let result = self
            .controller
            .export_json()
            .and_then(|json| write_text_file(&self.export_path, &json).map_err(ExportError::from));

        self.flash = Some(match result {
            Ok(()) => {
                tracing::info!("Exported quotes to {}", self.export_path.display());
                Flash::success(format!(
                    "Exported {} quotes to {}",
                    self.controller.quotes().len(),
                    self.export_path.display()
                ))
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                Flash::error(format!("Export failed: {}", e))
            }
        });
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
        self.temp_text.clear();
    }
}
