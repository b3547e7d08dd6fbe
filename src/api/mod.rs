// ==========================================
// 焊接工时计算系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// 约束: 输入在此层校验完毕后才进入领域层与仓储层
// ==========================================

pub mod calculation_api;
pub mod error;
pub mod group_api;
pub mod history_api;
pub mod validator;

// 重导出核心类型
pub use calculation_api::{
    CalculationApi, CalculationOutcome, CalculationRequest, ValidationOutcome,
};
pub use error::{ApiError, ApiResult};
pub use group_api::GroupApi;
pub use history_api::HistoryApi;
pub use validator::InputValidator;
