// ==========================================
// 焊接工时计算系统 - 领域类型定义
// ==========================================
// 尺寸区间: 封闭枚举 (4 个固定区间)
// 偏差状态: 三档分级 (≤10% / ≤20% / >20%)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 尺寸区间 (Size Bracket)
// ==========================================
// 红线: 区间集合固定，不接受任意字符串
// 序列化格式: 规范标签 (与数据文件、历史库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeBracket {
    #[serde(rename = "do 2m2")]
    UpTo2, // ≤ 2 m²
    #[serde(rename = "od 2 do 20m2")]
    From2To20, // 2–20 m²
    #[serde(rename = "od 20 do 60m2")]
    From20To60, // 20–60 m²
    #[serde(rename = "powyżej 60m2")]
    Above60, // > 60 m²
}

impl SizeBracket {
    /// 全部区间（显示顺序）
    pub const ALL: [SizeBracket; 4] = [
        SizeBracket::UpTo2,
        SizeBracket::From2To20,
        SizeBracket::From20To60,
        SizeBracket::Above60,
    ];

    /// 规范标签
    pub fn label(&self) -> &'static str {
        match self {
            SizeBracket::UpTo2 => "do 2m2",
            SizeBracket::From2To20 => "od 2 do 20m2",
            SizeBracket::From20To60 => "od 20 do 60m2",
            SizeBracket::Above60 => "powyżej 60m2",
        }
    }

    /// 按规范标签精确匹配
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label() == label)
    }

    /// 宽松解析（规范标签或简写）
    ///
    /// # 示例
    /// - "od 2 do 20m2" / "2-20" / "2–20m²" → From2To20
    /// - ">60" / "powyżej 60m2" → Above60
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Some(bracket) = Self::from_label(trimmed) {
            return Some(bracket);
        }

        let normalized = trimmed
            .to_lowercase()
            .replace('–', "-")
            .replace("m²", "")
            .replace("m2", "")
            .replace(' ', "");

        match normalized.as_str() {
            "<=2" | "≤2" | "0-2" | "do2" => Some(SizeBracket::UpTo2),
            "2-20" | "od2do20" => Some(SizeBracket::From2To20),
            "20-60" | "od20do60" => Some(SizeBracket::From20To60),
            ">60" | "powyżej60" => Some(SizeBracket::Above60),
            _ => None,
        }
    }
}

impl fmt::Display for SizeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 偏差状态 (Deviation Status)
// ==========================================
// 阈值含边界: |偏差| ≤ 10 → 正常, ≤ 20 → 可接受, 其余 → 超标
// 偏差先四舍五入到两位小数再分级，与显示值一致
pub const WITHIN_NORM_LIMIT_PCT: f64 = 10.0;
pub const ACCEPTABLE_LIMIT_PCT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviationStatus {
    WithinNorm, // 正常
    Acceptable, // 可接受
    OutOfNorm,  // 超标
}

impl DeviationStatus {
    /// 按偏差百分比分级
    pub fn classify(deviation_pct: f64) -> Self {
        let abs = (deviation_pct.abs() * 100.0).round() / 100.0;
        if abs <= WITHIN_NORM_LIMIT_PCT {
            DeviationStatus::WithinNorm
        } else if abs <= ACCEPTABLE_LIMIT_PCT {
            DeviationStatus::Acceptable
        } else {
            DeviationStatus::OutOfNorm
        }
    }

    /// i18n 键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            DeviationStatus::WithinNorm => "status.within_norm",
            DeviationStatus::Acceptable => "status.acceptable",
            DeviationStatus::OutOfNorm => "status.out_of_norm",
        }
    }
}

impl fmt::Display for DeviationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviationStatus::WithinNorm => write!(f, "WITHIN_NORM"),
            DeviationStatus::Acceptable => write!(f, "ACCEPTABLE"),
            DeviationStatus::OutOfNorm => write!(f, "OUT_OF_NORM"),
        }
    }
}
