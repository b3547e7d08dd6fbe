// ==========================================
// 焊接工时计算系统 - 产品计算模型
// ==========================================
// 公式: 总工时 = 米数 × 分钟/米(区间) × 有效人数
// 有效人数: 强制人数优先，否则取工时表人数
// 偏差: (生产工时 - 计算工时) / 计算工时 × 100
// ==========================================

use crate::domain::group::ProductGroup;
use crate::domain::types::{DeviationStatus, SizeBracket};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

// ==========================================
// ProductCode - 产品代码
// ==========================================
// 格式: 3 位数字-4 位数字-3 位数字 (仅 ASCII 数字)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductCode(String);

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{3}-[0-9]{4}-[0-9]{3}$").expect("product code pattern is valid")
    })
}

impl ProductCode {
    /// 解析产品代码（先去除首尾空白）
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if code_pattern().is_match(trimmed) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ==========================================
// MethodResult - 单方法计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResult {
    pub method: String,
    pub meters: f64,
    pub minutes_per_meter: f64,
    pub workers: u32,
    pub forced: bool, // 是否使用强制人数
    pub total_time: f64,
}

/// 偏差百分比
///
/// # 返回
/// - Some(偏差%): 计算工时 > 0
/// - None: 计算工时为 0（无法定义偏差）
pub fn deviation_percent(total_time: f64, production_time: f64) -> Option<f64> {
    if total_time > 0.0 {
        Some((production_time - total_time) / total_time * 100.0)
    } else {
        None
    }
}

// ==========================================
// Product - 计算请求 (瞬态，不持久化)
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub code: ProductCode,
    pub group_name: String,
    pub bracket: SizeBracket,
    meters_by_method: BTreeMap<String, f64>,
    forced_workers_by_method: BTreeMap<String, u32>,
    production_time: Option<f64>,
    results: Vec<MethodResult>,
}

impl Product {
    pub fn new(code: ProductCode, group: &ProductGroup, bracket: SizeBracket) -> Self {
        Self {
            code,
            group_name: group.name.clone(),
            bracket,
            meters_by_method: BTreeMap::new(),
            forced_workers_by_method: BTreeMap::new(),
            production_time: None,
            results: Vec::new(),
        }
    }

    pub fn set_meters(&mut self, method: impl Into<String>, meters: f64) {
        self.meters_by_method.insert(method.into(), meters);
    }

    pub fn force_workers(&mut self, method: impl Into<String>, workers: u32) {
        self.forced_workers_by_method.insert(method.into(), workers);
    }

    pub fn set_production_time(&mut self, minutes: Option<f64>) {
        self.production_time = minutes;
    }

    pub fn production_time(&self) -> Option<f64> {
        self.production_time
    }

    pub fn meters_by_method(&self) -> &BTreeMap<String, f64> {
        &self.meters_by_method
    }

    /// 参与计算的米数（仅 > 0）
    pub fn recorded_meters(&self) -> BTreeMap<String, f64> {
        self.meters_by_method
            .iter()
            .filter(|(_, meters)| **meters > 0.0)
            .map(|(name, meters)| (name.clone(), *meters))
            .collect()
    }

    pub fn results(&self) -> &[MethodResult] {
        &self.results
    }

    /// 计算各方法工时
    ///
    /// 以传入产品组的当前状态为准（按组内方法顺序输出）；
    /// 已从组中删除的方法直接丢弃。重复调用结果一致。
    pub fn compute(&mut self, group: &ProductGroup) {
        let mut results = Vec::new();

        for method in group.methods() {
            let meters = match self.meters_by_method.get(method.name()) {
                Some(meters) if *meters > 0.0 => *meters,
                _ => continue,
            };
            // 组内重名方法只计一次
            if results.iter().any(|r: &MethodResult| r.method == method.name()) {
                continue;
            }

            let (table_workers, minutes_per_meter) = method.get_time(self.bracket);
            let forced = self.forced_workers_by_method.get(method.name()).copied();
            let workers = forced.unwrap_or(table_workers);

            results.push(MethodResult {
                method: method.name().to_string(),
                meters,
                minutes_per_meter,
                workers,
                forced: forced.is_some(),
                total_time: meters * minutes_per_meter * f64::from(workers),
            });
        }

        let dropped = self
            .recorded_meters()
            .keys()
            .filter(|name| !group.contains_method(name))
            .count();
        if dropped > 0 {
            tracing::debug!(code = %self.code, dropped, "忽略已不在产品组中的方法");
        }

        self.results = results;
    }

    /// 总工时（分钟）
    pub fn total_time(&self) -> f64 {
        self.results.iter().map(|r| r.total_time).sum()
    }

    /// 与生产工时的偏差（%）
    pub fn deviation(&self) -> Option<f64> {
        self.production_time
            .and_then(|production| deviation_percent(self.total_time(), production))
    }

    pub fn status(&self) -> Option<DeviationStatus> {
        self.deviation().map(DeviationStatus::classify)
    }
}
