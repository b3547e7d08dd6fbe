// ==========================================
// 焊接工时计算系统 - 应用层
// ==========================================
// 职责: 连接命令行与 API；状态装配与文本报表
// ==========================================

pub mod report;
pub mod state;

// 重导出
pub use report::{
    render_calculation, render_groups, render_history, render_request, render_validation,
};
pub use state::AppState;
