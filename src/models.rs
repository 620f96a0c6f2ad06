use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 表示"不过滤"的分类哨兵值
pub const ALL_CATEGORIES: &str = "all";

/// 未填写分类时使用的默认分类
pub const DEFAULT_CATEGORY: &str = "general";

/// 规范化分类：去除首尾空白并转小写，空白时回退为 "general"
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// 名言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// 由原始输入构造名言，文本为空白时返回 None
    pub fn new(text: &str, category: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text: text.to_string(),
            category: normalize_category(category),
        })
    }
}

/// 导入校验失败的原因
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid file format: expected an array of quotes")]
    NotAnArray,
    #[error("quote #{} has no usable text", .index + 1)]
    MissingText { index: usize },
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
}

/// 名言集合，保持插入顺序，允许重复
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteCollection {
    quotes: Vec<Quote>,
}

impl QuoteCollection {
    /// 内置的默认名言列表
    pub fn builtin() -> Self {
        let quotes = [
            (
                "The only limit to our realization of tomorrow is our doubts of today.",
                "inspiration",
            ),
            (
                "Life is what happens when you're busy making other plans.",
                "life",
            ),
            ("The purpose of our lives is to be happy.", "life"),
            ("Do one thing every day that scares you.", "courage"),
        ]
        .into_iter()
        .map(|(text, category)| Quote {
            text: text.to_string(),
            category: category.to_string(),
        })
        .collect();

        Self { quotes }
    }

    /// 解析持久化的集合；缺失、格式错误或为空时返回 None
    pub fn from_persisted(raw: Option<&str>) -> Option<Self> {
        let collection = Self::parse_import(raw?).ok()?;
        if collection.is_empty() {
            None
        } else {
            Some(collection)
        }
    }

    /// 解析并校验导入内容
    ///
    /// 必须是 JSON 数组，且每个元素的 `text` 去空白后非空，否则整体拒绝。
    pub fn parse_import(contents: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(contents)?;
        let items = value.as_array().ok_or(ImportError::NotAnArray)?;

        let quotes = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let text = item
                    .get("text")
                    .and_then(Value::as_str)
                    .ok_or(ImportError::MissingText { index })?;
                let category = match item.get("category") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                };
                Quote::new(text, &category).ok_or(ImportError::MissingText { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { quotes })
    }

    /// 序列化为紧凑 JSON（用于持久化）
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.quotes)
    }

    /// 序列化为带缩进的 JSON（用于导出）
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.quotes)
    }

    pub fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[Quote] {
        &self.quotes
    }

    /// 去重并按字典序排列的分类
    pub fn categories(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|q| q.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.quotes.iter().any(|q| q.category == category)
    }

    /// 候选池：`all` 或未知分类返回全部，否则只返回该分类
    pub fn pool(&self, category: &str) -> Vec<&Quote> {
        if category == ALL_CATEGORIES || !self.has_category(category) {
            self.quotes.iter().collect()
        } else {
            self.quotes
                .iter()
                .filter(|q| q.category == category)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_normalization() {
        let quote = Quote::new("  Stay hungry.  ", "  Wisdom ").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "wisdom");

        let quote = Quote::new("Stay hungry.", "").unwrap();
        assert_eq!(quote.category, "general");

        assert!(Quote::new("   ", "x").is_none());
    }

    #[test]
    fn test_categories_sorted_and_unique() {
        let collection = QuoteCollection::builtin();
        assert_eq!(collection.categories(), vec!["courage", "inspiration", "life"]);
    }

    #[test]
    fn test_pool_filters_by_category() {
        let collection = QuoteCollection::builtin();
        assert_eq!(collection.pool("all").len(), 4);
        assert_eq!(collection.pool("life").len(), 2);
        assert!(collection.pool("life").iter().all(|q| q.category == "life"));
        // 过期的分类按 all 处理
        assert_eq!(collection.pool("missing").len(), 4);
    }

    #[test]
    fn test_parse_import_rejects_invalid_shapes() {
        assert!(matches!(
            QuoteCollection::parse_import(r#"{"foo":1}"#),
            Err(ImportError::NotAnArray)
        ));
        assert!(matches!(
            QuoteCollection::parse_import(r#"[{"category":"x"}]"#),
            Err(ImportError::MissingText { index: 0 })
        ));
        assert!(matches!(
            QuoteCollection::parse_import(r#"[{"text":"ok"},{"text":"   "}]"#),
            Err(ImportError::MissingText { index: 1 })
        ));
        assert!(matches!(
            QuoteCollection::parse_import("not json"),
            Err(ImportError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_import_normalizes_categories() {
        let collection = QuoteCollection::parse_import(
            r#"[{"text":" a "},{"text":"b","category":"  LIFE "},{"text":"c","category":7}]"#,
        )
        .unwrap();

        let categories: Vec<&str> = collection
            .as_slice()
            .iter()
            .map(|q| q.category.as_str())
            .collect();
        assert_eq!(categories, vec!["general", "life", "7"]);
        assert_eq!(collection.as_slice()[0].text, "a");
    }

    #[test]
    fn test_from_persisted_falls_back() {
        assert!(QuoteCollection::from_persisted(None).is_none());
        assert!(QuoteCollection::from_persisted(Some("[]")).is_none());
        assert!(QuoteCollection::from_persisted(Some("{broken")).is_none());

        let raw = QuoteCollection::builtin().to_json().unwrap();
        assert_eq!(
            QuoteCollection::from_persisted(Some(&raw)),
            Some(QuoteCollection::builtin())
        );
    }
}
