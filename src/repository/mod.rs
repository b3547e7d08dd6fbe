// ==========================================
// 焊接工时计算系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽存储细节
// - DataStore: 产品组/方法 (JSON 文件，写穿)
// - HistoryStore: 计算历史 (SQLite)
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod data_store;
pub mod error;
pub mod history_repo;

// 重导出核心仓储
pub use data_store::{default_groups, DataStore};
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::HistoryStore;
