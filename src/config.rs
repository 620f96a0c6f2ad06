//! 配置文件 (~/.config/quotegen/config.toml)
//!
//! 所有字段都可省略，文件缺失或损坏时使用默认值。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_DIR: &str = "quotegen";

pub const DEFAULT_FLASH_SECONDS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 覆盖默认的数据目录
    pub data_dir: Option<PathBuf>,
    /// 导出 quotes.json 的目录，同时也是导入对话框的默认位置
    pub export_dir: Option<PathBuf>,
    /// 成功提示的显示秒数
    pub flash_seconds: i64,
    /// tracing 过滤表达式，RUST_LOG 优先
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            export_dir: None,
            flash_seconds: DEFAULT_FLASH_SECONDS,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// 数据目录 (~/.local/share/quotegen/)
    pub fn data_dir(&self) -> io::Result<PathBuf> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "cannot locate user data directory"))?
                .join(APP_DIR),
        };

        fs::create_dir_all(&data_dir)?;

        Ok(data_dir)
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quotes.json")
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// 加载配置，失败时回退为默认值
///
/// 在日志初始化之前调用，因此解析错误会随返回值一并交给调用方记录。
pub fn load_config(path: Option<&Path>) -> (Config, Option<String>) {
    let Some(path) = path else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }

    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| toml::from_str::<Config>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => (config, None),
        Err(e) => (
            Config::default(),
            Some(format!("Failed to load config {}, using defaults: {}", path.display(), e)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warning) = load_config(Some(&dir.path().join("config.toml")));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "flash_seconds = 5\nexport_dir = \"/tmp/out\"\n").unwrap();

        let (config, warning) = load_config(Some(&path));
        assert!(warning.is_none());
        assert_eq!(config.flash_seconds, 5);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.export_path(), PathBuf::from("/tmp/out/quotes.json"));
    }

    #[test]
    fn test_invalid_config_reports_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "flash_seconds = \"soon\"").unwrap();

        let (config, warning) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn test_data_dir_override_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            ..Config::default()
        };
        let data_dir = config.data_dir().unwrap();
        assert!(data_dir.is_dir());
    }
}
