// ==========================================
// 焊接工时计算系统 - 焊接方法领域模型
// ==========================================
// 工时表: 尺寸区间 → (人数, 分钟/米)
// 缺省策略: 未配置的区间返回 (1, 0.0)，不报错
// ==========================================

use crate::domain::defaults::default_time_table;
use crate::domain::types::SizeBracket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 未配置区间的缺省工时 (人数, 分钟/米)
pub const DEFAULT_TIME_ON_MISS: (u32, f64) = (1, 0.0);

// ==========================================
// TimeEntry - 单个区间的工时配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub workers: u32,           // 人数 (正整数)
    pub minutes_per_meter: f64, // 分钟/米 (非负)
}

// ==========================================
// WeldingMethod - 焊接方法
// ==========================================
// 对齐: 数据文件 {name, timeTable}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MethodRecord", into = "MethodRecord")]
pub struct WeldingMethod {
    name: String,
    time_table: BTreeMap<SizeBracket, TimeEntry>,
}

impl WeldingMethod {
    /// 创建焊接方法
    ///
    /// 规范方法带默认工时表，其余方法为空表
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let time_table = default_time_table(&name)
            .map(|table| {
                table
                    .into_iter()
                    .map(|(bracket, workers, minutes_per_meter)| {
                        (bracket, TimeEntry { workers, minutes_per_meter })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { name, time_table }
    }

    /// 创建空表方法（不套用默认值）
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_table: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
    }

    pub fn time_table(&self) -> &BTreeMap<SizeBracket, TimeEntry> {
        &self.time_table
    }

    /// 写入（或覆盖）某区间的工时
    ///
    /// 不做取值校验，由调用方在边界处校验
    pub fn set_time(&mut self, bracket: SizeBracket, workers: u32, minutes_per_meter: f64) {
        self.time_table.insert(
            bracket,
            TimeEntry {
                workers,
                minutes_per_meter,
            },
        );
    }

    /// 读取某区间的工时
    ///
    /// # 返回
    /// - (人数, 分钟/米)；区间未配置时返回 DEFAULT_TIME_ON_MISS
    pub fn get_time(&self, bracket: SizeBracket) -> (u32, f64) {
        self.time_table
            .get(&bracket)
            .map(|entry| (entry.workers, entry.minutes_per_meter))
            .unwrap_or(DEFAULT_TIME_ON_MISS)
    }
}

// ==========================================
// MethodRecord - 文件记录形态
// ==========================================
// timeTable 以规范标签为键；未知标签跳过并告警
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MethodRecord {
    name: String,
    #[serde(default)]
    time_table: BTreeMap<String, TimeEntry>,
}

impl From<MethodRecord> for WeldingMethod {
    fn from(record: MethodRecord) -> Self {
        let mut time_table = BTreeMap::new();
        for (label, entry) in record.time_table {
            match SizeBracket::from_label(&label) {
                Some(bracket) => {
                    time_table.insert(bracket, entry);
                }
                None => {
                    tracing::warn!(method = %record.name, label = %label, "跳过未知尺寸区间");
                }
            }
        }

        Self {
            name: record.name,
            time_table,
        }
    }
}

impl From<WeldingMethod> for MethodRecord {
    fn from(method: WeldingMethod) -> Self {
        Self {
            name: method.name,
            time_table: method
                .time_table
                .into_iter()
                .map(|(bracket, entry)| (bracket.label().to_string(), entry))
                .collect(),
        }
    }
}
