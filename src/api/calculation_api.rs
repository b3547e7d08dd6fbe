// ==========================================
// 焊接工时计算系统 - 计算 API
// ==========================================
// 职责: 校验计算请求 → 计算工时 → 写入历史 → (可选) 回填生产工时
// 红线: 任一校验失败时不创建 Product，不写历史
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::InputValidator;
use crate::domain::{
    deviation_percent, DeviationStatus, MethodResult, Product, ProductGroup, SizeBracket,
};
use crate::i18n::t_with_args;
use crate::repository::{DataStore, HistoryStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

// ==========================================
// 请求 / 响应
// ==========================================

/// 计算请求
///
/// 方法名按产品组内名称匹配（大小写不敏感）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub code: String,
    pub group_name: String,
    pub bracket: SizeBracket,
    pub meters: BTreeMap<String, f64>,
    #[serde(default)]
    pub forced_workers: BTreeMap<String, u32>,
    #[serde(default)]
    pub production_time: Option<f64>,
}

impl CalculationRequest {
    pub fn new(
        code: impl Into<String>,
        group_name: impl Into<String>,
        bracket: SizeBracket,
    ) -> Self {
        Self {
            code: code.into(),
            group_name: group_name.into(),
            bracket,
            meters: BTreeMap::new(),
            forced_workers: BTreeMap::new(),
            production_time: None,
        }
    }

    pub fn with_meters(mut self, method: impl Into<String>, meters: f64) -> Self {
        self.meters.insert(method.into(), meters);
        self
    }

    pub fn with_forced_workers(mut self, method: impl Into<String>, workers: u32) -> Self {
        self.forced_workers.insert(method.into(), workers);
        self
    }

    pub fn with_production_time(mut self, minutes: f64) -> Self {
        self.production_time = Some(minutes);
        self
    }
}

/// 计算结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationOutcome {
    pub entry_id: i64,
    pub code: String,
    pub group_name: String,
    pub bracket: SizeBracket,
    pub breakdown: Vec<MethodResult>,
    pub total_time: f64,
    pub production_time: Option<f64>,
    pub deviation: Option<f64>,
    pub status: Option<DeviationStatus>,
}

/// 生产工时回填结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub entry_id: i64,
    pub total_time: f64,
    pub production_time: f64,
    pub deviation: Option<f64>,
    pub status: Option<DeviationStatus>,
}

// ==========================================
// CalculationApi
// ==========================================
pub struct CalculationApi {
    history: HistoryStore,
}

impl CalculationApi {
    pub fn new(history: HistoryStore) -> Self {
        Self { history }
    }

    /// 执行一次工时计算并写入历史
    ///
    /// # 返回
    /// - Ok(CalculationOutcome): 含历史记录 id
    /// - Err(InvalidInput): 代码/组/方法/数值不合法（不写历史）
    #[instrument(skip(self, store, request), fields(code = %request.code, group = %request.group_name))]
    pub fn calculate(
        &self,
        store: &DataStore,
        request: &CalculationRequest,
    ) -> ApiResult<CalculationOutcome> {
        let code = InputValidator::validate_code(&request.code)?;

        let group = store
            .find_group_index(&request.group_name)
            .and_then(|index| store.group(index))
            .ok_or_else(|| {
                ApiError::InvalidInput(t_with_args(
                    "validation.unknown_group",
                    &[("value", request.group_name.trim())],
                ))
            })?;

        let mut meters = BTreeMap::new();
        for (method, value) in &request.meters {
            let name = resolve_method(group, method)?;
            let value = InputValidator::check_non_negative(name, *value)?;
            meters.insert(name.to_string(), value);
        }
        if !meters.values().any(|m| *m > 0.0) {
            return Err(ApiError::InvalidInput(t_with_args("validation.no_meters", &[])));
        }

        let mut forced_workers = BTreeMap::new();
        for (method, workers) in &request.forced_workers {
            let name = resolve_method(group, method)?;
            let workers = InputValidator::check_workers(name, *workers)?;
            forced_workers.insert(name.to_string(), workers);
        }

        let production_time = request
            .production_time
            .map(|p| InputValidator::check_non_negative("production_time", p))
            .transpose()?;

        // 校验全部通过，开始计算
        let mut product = Product::new(code, group, request.bracket);
        for (name, value) in meters {
            product.set_meters(name, value);
        }
        for (name, workers) in forced_workers {
            product.force_workers(name, workers);
        }
        product.compute(group);
        let total_time = product.total_time();

        // 先写入未回填的记录，生产工时与偏差统一走回填路径
        // 回填失败时记录已提交但不含生产工时，可再执行 validate 补填
        let entry_id = self.history.add_entry(
            product.code.as_str(),
            &product.group_name,
            product.bracket,
            &product.recorded_meters(),
            total_time,
            None,
        )?;

        let mut deviation = None;
        if let Some(production_time) = production_time {
            deviation = deviation_percent(total_time, production_time);
            self.history
                .update_production_time(entry_id, production_time, deviation)?;
            product.set_production_time(Some(production_time));
        }

        tracing::info!(entry_id, total_time, "工时计算完成");

        Ok(CalculationOutcome {
            entry_id,
            code: product.code.to_string(),
            group_name: product.group_name.clone(),
            bracket: product.bracket,
            breakdown: product.results().to_vec(),
            total_time,
            production_time,
            deviation,
            status: product.status(),
        })
    }

    /// 回填生产工时并计算偏差
    ///
    /// 已回填的记录允许再次回填（覆盖）
    #[instrument(skip(self))]
    pub fn validate(&self, entry_id: i64, production_time: f64) -> ApiResult<ValidationOutcome> {
        let production_time =
            InputValidator::check_non_negative("production_time", production_time)?;

        let record = self.history.find_by_id(entry_id)?.ok_or_else(|| {
            ApiError::NotFound(t_with_args(
                "validation.unknown_entry",
                &[("value", &entry_id.to_string())],
            ))
        })?;

        let deviation = deviation_percent(record.total_time, production_time);
        self.history
            .update_production_time(entry_id, production_time, deviation)?;

        tracing::info!(entry_id, production_time, ?deviation, "生产工时已回填");

        Ok(ValidationOutcome {
            entry_id,
            total_time: record.total_time,
            production_time,
            deviation,
            status: deviation.map(DeviationStatus::classify),
        })
    }
}

/// 在产品组内解析方法名（先精确，后大小写不敏感）
fn resolve_method<'g>(group: &'g ProductGroup, name: &str) -> ApiResult<&'g str> {
    let trimmed = name.trim();
    let lowered = trimmed.to_lowercase();
    group
        .methods()
        .iter()
        .find(|m| m.name() == trimmed)
        .or_else(|| {
            group
                .methods()
                .iter()
                .find(|m| m.name().to_lowercase() == lowered)
        })
        .map(|m| m.name())
        .ok_or_else(|| {
            ApiError::InvalidInput(t_with_args(
                "validation.unknown_method",
                &[("value", trimmed), ("group", &group.name)],
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ZEMAT: &str = "HF Duży (ZEMAT)";
    const SEAMTEC: &str = "Gorący Klin (SEAMTEC)";

    fn setup() -> (TempDir, DataStore, CalculationApi, HistoryStore) {
        let dir = TempDir::new().unwrap();
        let store = DataStore::with_defaults(dir.path().join("data.json"));
        let history = HistoryStore::open(dir.path().join("history.db")).unwrap();
        let api = CalculationApi::new(history.clone());
        (dir, store, api, history)
    }

    #[test]
    fn test_calculate_persists_entry() {
        let (_dir, store, api, history) = setup();
        let request = CalculationRequest::new("123-4567-890", "Koła", SizeBracket::From2To20)
            .with_meters(ZEMAT, 10.0);

        let outcome = api.calculate(&store, &request).unwrap();
        assert_eq!(outcome.total_time, 30.0);
        assert_eq!(outcome.breakdown.len(), 1);
        assert_eq!(outcome.deviation, None);

        let record = history.find_by_id(outcome.entry_id).unwrap().unwrap();
        assert_eq!(record.total_time, 30.0);
        assert_eq!(record.meters.get(ZEMAT), Some(&10.0));
        assert_eq!(record.production_time, None);
    }

    #[test]
    fn test_calculate_with_production_time_sets_deviation() {
        let (_dir, store, api, history) = setup();
        let request = CalculationRequest::new("123-4567-890", "koła", SizeBracket::From2To20)
            .with_meters(ZEMAT, 10.0)
            .with_meters(SEAMTEC, 5.0)
            .with_forced_workers(SEAMTEC, 3)
            .with_production_time(60.0);

        let outcome = api.calculate(&store, &request).unwrap();
        assert_eq!(outcome.group_name, "Koła");
        assert_eq!(outcome.total_time, 52.5);
        let deviation = outcome.deviation.unwrap();
        assert!((deviation - 14.285714285714286).abs() < 1e-9);
        assert_eq!(outcome.status, Some(DeviationStatus::Acceptable));

        let record = history.find_by_id(outcome.entry_id).unwrap().unwrap();
        assert_eq!(record.production_time, Some(60.0));
        assert!((record.deviation.unwrap() - deviation).abs() < 1e-9);
        assert_eq!(record.status(), outcome.status);
    }

    #[test]
    fn test_calculate_with_zero_total_keeps_production_time_without_deviation() {
        let (dir, _store, api, history) = setup();
        let mut store = DataStore::with_defaults(dir.path().join("data.json"));
        store
            .edit_method_in_group(0, 0, &[(SizeBracket::UpTo2, 1, 0.0)])
            .unwrap();
        let request = CalculationRequest::new("123-4567-890", "Koła", SizeBracket::UpTo2)
            .with_meters(ZEMAT, 4.0)
            .with_production_time(12.0);

        let outcome = api.calculate(&store, &request).unwrap();
        assert_eq!(outcome.total_time, 0.0);
        assert_eq!(outcome.deviation, None);
        assert_eq!(outcome.status, None);

        let record = history.find_by_id(outcome.entry_id).unwrap().unwrap();
        assert_eq!(record.production_time, Some(12.0));
        assert_eq!(record.deviation, None);
        assert_eq!(history.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_input_writes_nothing() {
        let (_dir, store, api, history) = setup();
        let base = CalculationRequest::new("123-4567-890", "Koła", SizeBracket::UpTo2);

        let cases = vec![
            CalculationRequest {
                code: "12-4567-890".to_string(),
                ..base.clone().with_meters(ZEMAT, 1.0)
            },
            CalculationRequest {
                group_name: "Kubki".to_string(),
                ..base.clone().with_meters(ZEMAT, 1.0)
            },
            base.clone().with_meters("Laser", 1.0),
            base.clone().with_meters(ZEMAT, -1.0),
            base.clone().with_meters(ZEMAT, 0.0),
            base.clone().with_meters(ZEMAT, 1.0).with_forced_workers(ZEMAT, 0),
            base.clone().with_meters(ZEMAT, 1.0).with_production_time(-5.0),
        ];

        for request in cases {
            let err = api.calculate(&store, &request).unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)), "{:?}", request);
        }
        assert!(history.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_validate_updates_entry() {
        let (_dir, store, api, history) = setup();
        let request = CalculationRequest::new("123-4567-890", "Koła", SizeBracket::From2To20)
            .with_meters(ZEMAT, 10.0);
        let outcome = api.calculate(&store, &request).unwrap();

        let validation = api.validate(outcome.entry_id, 33.0).unwrap();
        assert_eq!(validation.total_time, 30.0);
        assert!((validation.deviation.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(validation.status, Some(DeviationStatus::WithinNorm));

        let record = history.find_by_id(outcome.entry_id).unwrap().unwrap();
        assert_eq!(record.production_time, Some(33.0));
    }

    #[test]
    fn test_validate_unknown_entry() {
        let (_dir, _store, api, _history) = setup();
        assert!(matches!(api.validate(999, 10.0), Err(ApiError::NotFound(_))));
    }
}
