// ==========================================
// 焊接工时计算系统 - 领域模型层
// ==========================================
// 职责: 焊接方法、产品组、计算模型、历史记录
// 红线: 不含数据访问逻辑
// ==========================================

pub mod defaults;
pub mod group;
pub mod history;
pub mod method;
pub mod product;
pub mod types;

// 重导出核心类型
pub use defaults::{default_time_table, is_canonical_method, CANONICAL_METHODS, DEFAULT_GROUPS};
pub use group::ProductGroup;
pub use history::HistoryRecord;
pub use method::{TimeEntry, WeldingMethod, DEFAULT_TIME_ON_MISS};
pub use product::{deviation_percent, MethodResult, Product, ProductCode};
pub use types::{DeviationStatus, SizeBracket};
