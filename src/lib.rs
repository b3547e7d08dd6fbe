// ==========================================
// 焊接工时计算系统 - 核心库
// ==========================================
// 职责: 按产品组/焊接方法/尺寸区间计算焊接工时，
//       与生产实测工时比对偏差，并保存计算历史
// 技术栈: Rust + SQLite + JSON 数据文件
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pl");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导出层 - Excel
pub mod exporter;

// 配置层 - 路径与语言
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与报表
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DeviationStatus, SizeBracket};

// 领域实体
pub use domain::{HistoryRecord, MethodResult, Product, ProductCode, ProductGroup, WeldingMethod};

// 仓储
pub use repository::{DataStore, HistoryStore};

// API
pub use api::{CalculationApi, CalculationRequest, GroupApi, HistoryApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Kalkulator czasu zgrzewania";
