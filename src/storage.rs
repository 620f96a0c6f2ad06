use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 持久化集合的键
pub const QUOTES_KEY: &str = "dq_quotes_v1";

/// 上次选中分类的键
pub const LAST_CATEGORY_KEY: &str = "dq_last_category_v1";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode store: {0}")]
    Encode(#[from] toml::ser::Error),
    #[cfg(test)]
    #[error("write rejected by store")]
    Rejected,
}

impl From<StorageError> for io::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => e,
            other => io::Error::other(other),
        }
    }
}

/// 键值字符串存储
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// TOML 文件结构
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// 基于单个 TOML 文件的存储，每次写入都整体落盘
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: StoreData,
}

impl FileStore {
    /// 打开存储文件；文件不存在时为空，无法读取或解析时记录警告并视为空
    pub fn open(path: &Path) -> Self {
        let data = if path.exists() {
            read_data(path).unwrap_or_else(|e| {
                tracing::warn!("Store file {} is unreadable, starting empty: {}", path.display(), e);
                StoreData::default()
            })
        } else {
            StoreData::default()
        };

        Self {
            path: path.to_path_buf(),
            data,
        }
    }

    fn flush(&self) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(&self.data)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

fn read_data(path: &Path) -> Result<StoreData, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    toml::from_str(&content).map_err(|e| e.to_string())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data
            .entries
            .insert(key.to_string(), value.to_string());
        self.flush()?;
        tracing::debug!("Persisted key {} to {}", key, self.path.display());
        Ok(())
    }
}

/// 内存存储，测试用
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Rejected);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 读取文件全部内容
pub fn read_text_file(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// 写入文本文件，必要时创建父目录
pub fn write_text_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)
}
