// ==========================================
// 焊接工时计算系统 - 计算历史 API
// ==========================================
// 职责: 历史查询 / 删除 / Excel 导出 / 按记录回填计算请求
// ==========================================

use crate::api::calculation_api::CalculationRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::HistoryRecord;
use crate::i18n::{t, t_with_args};
use crate::repository::HistoryStore;
use std::path::Path;

pub struct HistoryApi {
    history: HistoryStore,
}

impl HistoryApi {
    pub fn new(history: HistoryStore) -> Self {
        Self { history }
    }

    /// 全部记录（最新在前）
    pub fn list(&self) -> ApiResult<Vec<HistoryRecord>> {
        Ok(self.history.list_all()?)
    }

    pub fn get(&self, id: i64) -> ApiResult<HistoryRecord> {
        self.history.find_by_id(id)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args(
                "validation.unknown_entry",
                &[("value", &id.to_string())],
            ))
        })
    }

    /// 删除记录
    ///
    /// # 返回
    /// - Ok(false): 记录不存在
    pub fn delete(&self, id: i64) -> ApiResult<bool> {
        let deleted = self.history.delete_entry(id)?;
        tracing::info!(id, deleted, "删除计算记录");
        Ok(deleted)
    }

    /// 导出 Excel
    ///
    /// 无记录时返回 BusinessRuleViolation，不生成文件
    pub fn export<P: AsRef<Path>>(&self, path: P) -> ApiResult<()> {
        if self.history.export_to_spreadsheet(path)? {
            Ok(())
        } else {
            Err(ApiError::BusinessRuleViolation(t("history.nothing_to_export")))
        }
    }

    /// 按历史记录重建计算请求（代码/组/区间/米数）
    ///
    /// 生产工时与强制人数不回填
    pub fn recall(&self, id: i64) -> ApiResult<CalculationRequest> {
        let record = self.get(id)?;
        let mut request =
            CalculationRequest::new(record.code, record.group_name, record.bracket);
        request.meters = record.meters;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SizeBracket;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn setup() -> (TempDir, HistoryStore, HistoryApi) {
        let dir = TempDir::new().unwrap();
        let history = HistoryStore::open(dir.path().join("history.db")).unwrap();
        let api = HistoryApi::new(history.clone());
        (dir, history, api)
    }

    #[test]
    fn test_recall_rebuilds_request() {
        let (_dir, history, api) = setup();
        let meters: BTreeMap<String, f64> =
            [("HF Duży (ZEMAT)".to_string(), 10.0)].into_iter().collect();
        let id = history
            .add_entry("123-4567-890", "Koła", SizeBracket::From2To20, &meters, 30.0, Some(33.0))
            .unwrap();

        let request = api.recall(id).unwrap();
        assert_eq!(request.code, "123-4567-890");
        assert_eq!(request.group_name, "Koła");
        assert_eq!(request.bracket, SizeBracket::From2To20);
        assert_eq!(request.meters, meters);
        assert!(request.forced_workers.is_empty());
        assert_eq!(request.production_time, None);
    }

    #[test]
    fn test_missing_entry() {
        let (_dir, _history, api) = setup();
        assert!(matches!(api.recall(7), Err(ApiError::NotFound(_))));
        assert!(!api.delete(7).unwrap());
    }

    #[test]
    fn test_export_without_rows_is_rejected() {
        let (dir, _history, api) = setup();
        let target = dir.path().join("out.xlsx");
        assert!(matches!(
            api.export(&target),
            Err(ApiError::BusinessRuleViolation(_))
        ));
        assert!(!target.exists());
    }
}
