// ==========================================
// 焊接工时计算系统 - 配置层
// ==========================================
// 职责: 数据文件路径与语言的解析，支持多级覆写
// ==========================================

pub mod app_config;

pub use app_config::{default_data_dir, AppConfig};
