// ==========================================
// 焊接工时计算系统 - 应用配置
// ==========================================
// 解析顺序: 命令行参数 > 环境变量 > 用户数据目录 > 工作目录
// 环境变量:
// - WELDING_TIME_DATA_FILE: 产品组 JSON 文件
// - WELDING_TIME_DB_PATH: 计算历史 SQLite 文件
// - WELDING_TIME_LOCALE: 界面语言 (pl / en)
// ==========================================

use crate::i18n::DEFAULT_LOCALE;
use std::path::PathBuf;

pub const ENV_DATA_FILE: &str = "WELDING_TIME_DATA_FILE";
pub const ENV_DB_PATH: &str = "WELDING_TIME_DB_PATH";
pub const ENV_LOCALE: &str = "WELDING_TIME_LOCALE";

pub const DATA_FILE_NAME: &str = "welding_data.json";
pub const DB_FILE_NAME: &str = "welding_history.db";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 产品组数据文件
    pub data_file: PathBuf,
    /// 计算历史数据库
    pub history_db: PathBuf,
    /// 界面语言
    pub locale: String,
}

impl AppConfig {
    /// 从进程环境解析配置
    pub fn resolve() -> Self {
        Self::resolve_with(|key| std::env::var(key).ok())
    }

    /// 以自定义变量来源解析配置（便于测试）
    pub fn resolve_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_file = non_empty(ENV_DATA_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir().join(DATA_FILE_NAME));
        let history_db = non_empty(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir().join(DB_FILE_NAME));
        let locale = non_empty(ENV_LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Self {
            data_file,
            history_db,
            locale,
        }
    }

    /// 命令行覆写（None 表示保留原值）
    pub fn with_overrides(
        mut self,
        data_file: Option<PathBuf>,
        history_db: Option<PathBuf>,
        locale: Option<String>,
    ) -> Self {
        if let Some(data_file) = data_file {
            self.data_file = data_file;
        }
        if let Some(history_db) = history_db {
            self.history_db = history_db;
        }
        if let Some(locale) = locale {
            self.locale = locale;
        }
        self
    }
}

/// 默认数据目录
///
/// 使用用户数据目录；开发构建使用独立目录，避免污染生产数据。
/// 拿不到用户数据目录时回退到工作目录。
pub fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => {
            #[cfg(debug_assertions)]
            {
                data_dir.join("welding-time-dev")
            }

            #[cfg(not(debug_assertions))]
            {
                data_dir.join("welding-time")
            }
        }
        None => PathBuf::from("."),
    }
}
