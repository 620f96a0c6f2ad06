//! 名言存储与视图控制器
//!
//! 持有名言集合与当前分类，负责与持久化存储保持同步。
//! 每个操作只返回纯数据结果（要显示的名言、分类列表等），
//! 由 UI 层负责把结果画到终端上。

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::models::{ALL_CATEGORIES, ImportError, Quote, QuoteCollection};
use crate::storage::{KeyValueStore, LAST_CATEGORY_KEY, QUOTES_KEY};

pub const NO_QUOTES_MESSAGE: &str = "No quotes available for this category.";

/// 一次随机抽取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteView {
    Shown(Quote),
    NoQuotes,
}

impl QuoteView {
    /// 带引号的名言文本
    pub fn display_text(&self) -> String {
        match self {
            QuoteView::Shown(quote) => format!("\"{}\"", quote.text),
            QuoteView::NoQuotes => NO_QUOTES_MESSAGE.to_string(),
        }
    }

    pub fn category_label(&self) -> Option<String> {
        match self {
            QuoteView::Shown(quote) => Some(format!("Category: {}", quote.category)),
            QuoteView::NoQuotes => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddQuoteError {
    #[error("Please enter a quote text.")]
    EmptyText,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize quotes: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write export file: {0}")]
    Write(#[from] std::io::Error),
}

pub struct QuoteController<S, R = StdRng> {
    store: S,
    rng: R,
    quotes: QuoteCollection,
    categories: Vec<String>,
    selected: String,
}

impl<S: KeyValueStore> QuoteController<S> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }
}

impl<S: KeyValueStore, R: Rng> QuoteController<S, R> {
    /// 从存储恢复集合与分类；持久化数据不可用时使用内置列表
    pub fn with_rng(store: S, rng: R) -> Self {
        let quotes = match QuoteCollection::from_persisted(store.get(QUOTES_KEY).as_deref()) {
            Some(quotes) => {
                tracing::info!("Loaded {} quotes from store", quotes.len());
                quotes
            }
            None => {
                tracing::info!("No usable stored quotes, using built-in list");
                QuoteCollection::builtin()
            }
        };

        let mut controller = Self {
            store,
            rng,
            quotes,
            categories: Vec::new(),
            selected: ALL_CATEGORIES.to_string(),
        };
        controller.rebuild_categories();
        controller
    }

    pub fn quotes(&self) -> &QuoteCollection {
        &self.quotes
    }

    pub fn selected_category(&self) -> &str {
        &self.selected
    }

    /// 分类选择器的选项：`all` 在前，其余按字典序
    pub fn category_options(&self) -> Vec<String> {
        std::iter::once(ALL_CATEGORIES.to_string())
            .chain(self.categories.iter().cloned())
            .collect()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 在当前候选池中均匀随机抽取一条
    pub fn pick(&mut self) -> QuoteView {
        let pool = self.quotes.pool(&self.selected);
        if pool.is_empty() {
            return QuoteView::NoQuotes;
        }

        let index = self.rng.gen_range(0..pool.len());
        let quote = pool[index].clone();
        tracing::debug!("Picked quote {}/{} in '{}'", index + 1, pool.len(), self.selected);
        QuoteView::Shown(quote)
    }

    /// 切换分类过滤器并重新抽取
    pub fn select_category(&mut self, category: &str) -> QuoteView {
        self.persist(LAST_CATEGORY_KEY, category);
        self.selected = category.to_string();
        self.pick()
    }

    /// 添加一条名言；文本为空白时拒绝且不改变任何状态
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<QuoteView, AddQuoteError> {
        let quote = Quote::new(text, category).ok_or(AddQuoteError::EmptyText)?;
        tracing::info!("Adding quote in '{}'", quote.category);

        self.quotes.push(quote);
        self.persist_quotes();
        self.rebuild_categories();
        Ok(self.pick())
    }

    /// 导出为带缩进的 JSON，不影响内存中的集合
    pub fn export_json(&self) -> Result<String, ExportError> {
        Ok(self.quotes.to_pretty_json()?)
    }

    /// 整体替换集合；校验失败时原集合保持不变
    pub fn import_json(&mut self, contents: &str) -> Result<QuoteView, ImportError> {
        let imported = QuoteCollection::parse_import(contents)?;
        tracing::info!("Imported {} quotes", imported.len());

        self.quotes = imported;
        self.persist_quotes();
        self.rebuild_categories();
        Ok(self.pick())
    }

    fn persist_quotes(&mut self) {
        match self.quotes.to_json() {
            Ok(json) => self.persist(QUOTES_KEY, &json),
            Err(e) => tracing::error!("Failed to serialize quotes: {}", e),
        }
    }

    /// 写入失败只记录日志，不影响当前操作
    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::error!("Failed to persist {}: {}", key, e);
        }
    }

    /// 重建分类列表，并按上次保存的分类恢复选择
    fn rebuild_categories(&mut self) {
        self.categories = self.quotes.categories();

        self.selected = match self.store.get(LAST_CATEGORY_KEY) {
            Some(last) if last == ALL_CATEGORIES || self.categories.contains(&last) => last,
            _ => ALL_CATEGORIES.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::storage::MemoryStore;

    fn controller() -> QuoteController<MemoryStore, StdRng> {
        QuoteController::with_rng(MemoryStore::default(), StdRng::seed_from_u64(7))
    }

    fn stored_quotes(c: &QuoteController<MemoryStore, StdRng>) -> QuoteCollection {
        QuoteCollection::parse_import(&c.store().get(QUOTES_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_initializes_from_builtin() {
        let c = controller();
        assert_eq!(c.quotes().len(), 4);
        assert_eq!(c.selected_category(), "all");
        assert_eq!(
            c.category_options(),
            vec!["all", "courage", "inspiration", "life"]
        );
    }

    #[test]
    fn test_initializes_from_store() {
        let mut store = MemoryStore::default();
        store
            .set(QUOTES_KEY, r#"[{"text":"x","category":"zen"}]"#)
            .unwrap();
        store.set(LAST_CATEGORY_KEY, "zen").unwrap();

        let c = QuoteController::with_rng(store, StdRng::seed_from_u64(1));
        assert_eq!(c.quotes().len(), 1);
        assert_eq!(c.selected_category(), "zen");
    }

    #[test]
    fn test_unknown_stored_category_resets_to_all() {
        let mut store = MemoryStore::default();
        store.set(LAST_CATEGORY_KEY, "vanished").unwrap();
        store.set(QUOTES_KEY, "not json").unwrap();

        let c = QuoteController::with_rng(store, StdRng::seed_from_u64(1));
        assert_eq!(c.quotes(), &QuoteCollection::builtin());
        assert_eq!(c.selected_category(), "all");
    }

    #[test]
    fn test_selected_category_limits_pool() {
        let mut c = controller();
        for _ in 0..100 {
            match c.select_category("life") {
                QuoteView::Shown(quote) => assert_eq!(quote.category, "life"),
                QuoteView::NoQuotes => panic!("pool should not be empty"),
            }
        }
        assert_eq!(c.store().get(LAST_CATEGORY_KEY).as_deref(), Some("life"));
    }

    #[test]
    fn test_all_eventually_shows_every_category() {
        let mut c = controller();
        c.select_category("all");

        let seen: HashSet<String> = (0..500)
            .filter_map(|_| match c.pick() {
                QuoteView::Shown(quote) => Some(quote.category),
                QuoteView::NoQuotes => None,
            })
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_add_quote_appends_and_persists() {
        let mut c = controller();
        c.add_quote("Stay hungry.", "").unwrap();

        assert_eq!(c.quotes().len(), 5);
        assert_eq!(
            c.quotes().as_slice().last(),
            Some(&Quote {
                text: "Stay hungry.".to_string(),
                category: "general".to_string(),
            })
        );
        assert_eq!(&stored_quotes(&c), c.quotes());
        assert!(c.category_options().contains(&"general".to_string()));
    }

    #[test]
    fn test_add_quote_rejects_blank_text() {
        let mut c = controller();
        assert_eq!(c.add_quote("  ", "x"), Err(AddQuoteError::EmptyText));
        assert_eq!(c.quotes().len(), 4);
        assert!(c.store().get(QUOTES_KEY).is_none());
    }

    #[test]
    fn test_add_keeps_persisted_category() {
        let mut c = controller();
        c.select_category("courage");
        c.add_quote("Be bold.", "Courage").unwrap();

        assert_eq!(c.selected_category(), "courage");
        assert_eq!(c.category_options().len(), 4);
    }

    #[test]
    fn test_store_write_failure_is_not_fatal() {
        let mut store = MemoryStore::default();
        store.fail_writes = true;
        let mut c = QuoteController::with_rng(store, StdRng::seed_from_u64(3));

        assert!(c.add_quote("Still works.", "misc").is_ok());
        assert_eq!(c.quotes().len(), 5);
    }

    #[test]
    fn test_export_then_import_roundtrip() {
        let mut c = controller();
        c.add_quote("Stay hungry.", "Wisdom").unwrap();
        let original = c.quotes().clone();

        let exported = c.export_json().unwrap();
        c.import_json(&exported).unwrap();
        assert_eq!(c.quotes(), &original);
    }

    #[test]
    fn test_import_replaces_collection() {
        let mut c = controller();
        let view = c
            .import_json(r#"[{"text":"only one","category":"Zen"}]"#)
            .unwrap();

        assert_eq!(c.quotes().len(), 1);
        assert_eq!(c.category_options(), vec!["all", "zen"]);
        assert_eq!(view.display_text(), "\"only one\"");
        assert_eq!(view.category_label().as_deref(), Some("Category: zen"));
        assert_eq!(&stored_quotes(&c), c.quotes());
    }

    #[test]
    fn test_import_rejections_leave_collection_intact() {
        let mut c = controller();
        assert!(c.import_json(r#"{"foo":1}"#).is_err());
        assert!(c.import_json(r#"[{"category":"x"}]"#).is_err());
        assert_eq!(c.quotes(), &QuoteCollection::builtin());
        assert!(c.store().get(QUOTES_KEY).is_none());
    }

    #[test]
    fn test_import_empty_array_shows_no_quotes() {
        let mut c = controller();
        let view = c.import_json("[]").unwrap();
        assert_eq!(view, QuoteView::NoQuotes);
        assert_eq!(view.display_text(), NO_QUOTES_MESSAGE);
        assert_eq!(c.category_options(), vec!["all"]);
    }

    #[test]
    fn test_import_drops_stale_selection() {
        let mut c = controller();
        c.select_category("life");
        c.import_json(r#"[{"text":"a","category":"zen"}]"#).unwrap();
        assert_eq!(c.selected_category(), "all");
    }
}
