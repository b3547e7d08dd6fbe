// ==========================================
// 焊接工时计算系统 - 导出层
// ==========================================
// 职责: 将计算历史写出为 Excel 工作簿
// 格式: .xlsx (汇总表 "Podsumowanie" + 米数明细表 "Metry")
// ==========================================

pub mod error;
pub mod workbook;

pub use error::{ExportError, ExportResult};
pub use workbook::{method_columns, write_history_workbook, DETAIL_SHEET, SUMMARY_HEADERS, SUMMARY_SHEET};
