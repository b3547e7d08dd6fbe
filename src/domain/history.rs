// ==========================================
// 焊接工时计算系统 - 计算历史领域模型
// ==========================================
// 对齐: calculation / calculation_meter 表
// 生命周期: 计算时创建 → (可选) 填入生产工时与偏差 → 可删除
// ==========================================

use crate::domain::types::{DeviationStatus, SizeBracket};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// HistoryRecord - 历史记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub group_name: String,
    pub bracket: SizeBracket,
    pub total_time: f64,
    pub production_time: Option<f64>,
    pub deviation: Option<f64>,
    pub meters: BTreeMap<String, f64>, // 稀疏: 仅 > 0
}

impl HistoryRecord {
    pub fn status(&self) -> Option<DeviationStatus> {
        self.deviation.map(DeviationStatus::classify)
    }

    pub fn is_validated(&self) -> bool {
        self.production_time.is_some()
    }
}
