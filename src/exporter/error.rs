// ==========================================
// 焊接工时计算系统 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("无可导出的数据")]
    NoData,

    #[error("工作簿写入失败: {0}")]
    WorkbookError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        match err {
            rust_xlsxwriter::XlsxError::IoError(e) => ExportError::FileWriteError(e.to_string()),
            other => ExportError::WorkbookError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
