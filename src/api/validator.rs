// ==========================================
// 焊接工时计算系统 - 输入校验器
// ==========================================
// 职责: 将用户输入的原始文本转换为领域值
// 规则:
// - 产品代码: xxx-xxxx-xxx (仅 ASCII 数字)
// - 米数/生产工时: 有限且非负 (允许逗号作小数点)
// - 人数: 正整数
// - 名称: 去空白后非空
// 错误消息来自 i18n 词条
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{ProductCode, SizeBracket};
use crate::i18n::t_with_args;

/// 输入校验器（无状态）
pub struct InputValidator;

impl InputValidator {
    /// 校验产品代码
    pub fn validate_code(raw: &str) -> ApiResult<ProductCode> {
        ProductCode::parse(raw).ok_or_else(|| {
            ApiError::InvalidInput(t_with_args(
                "validation.invalid_code",
                &[("value", raw.trim())],
            ))
        })
    }

    /// 解析尺寸区间（标准标签或简写）
    pub fn parse_bracket(raw: &str) -> ApiResult<SizeBracket> {
        SizeBracket::parse(raw).ok_or_else(|| {
            ApiError::InvalidInput(t_with_args(
                "validation.unknown_bracket",
                &[("value", raw.trim())],
            ))
        })
    }

    /// 解析数值
    fn parse_number(field: &str, raw: &str) -> ApiResult<f64> {
        let normalized = raw.trim().replace(',', ".");
        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                ApiError::InvalidInput(t_with_args(
                    "validation.not_a_number",
                    &[("field", field), ("value", raw.trim())],
                ))
            })
    }

    /// 校验非负有限数值
    pub fn check_non_negative(field: &str, value: f64) -> ApiResult<f64> {
        if !value.is_finite() {
            return Err(ApiError::InvalidInput(t_with_args(
                "validation.not_a_number",
                &[("field", field), ("value", &value.to_string())],
            )));
        }
        if value < 0.0 {
            return Err(ApiError::InvalidInput(t_with_args(
                "validation.negative",
                &[("field", field), ("value", &value.to_string())],
            )));
        }
        Ok(value)
    }

    /// 校验人数（正整数）
    pub fn check_workers(field: &str, workers: u32) -> ApiResult<u32> {
        if workers == 0 {
            return Err(ApiError::InvalidInput(t_with_args(
                "validation.workers_not_positive",
                &[("field", field), ("value", "0")],
            )));
        }
        Ok(workers)
    }

    /// 解析米数
    pub fn parse_meters(field: &str, raw: &str) -> ApiResult<f64> {
        let value = Self::parse_number(field, raw)?;
        Self::check_non_negative(field, value)
    }

    /// 解析每米工时（分钟）
    pub fn parse_minutes(field: &str, raw: &str) -> ApiResult<f64> {
        let value = Self::parse_number(field, raw)?;
        Self::check_non_negative(field, value)
    }

    /// 解析人数
    pub fn parse_workers(field: &str, raw: &str) -> ApiResult<u32> {
        let workers = raw.trim().parse::<u32>().map_err(|_| {
            ApiError::InvalidInput(t_with_args(
                "validation.workers_not_positive",
                &[("field", field), ("value", raw.trim())],
            ))
        })?;
        Self::check_workers(field, workers)
    }

    /// 解析生产工时（分钟）
    pub fn parse_production_time(raw: &str) -> ApiResult<f64> {
        let value = Self::parse_number("production_time", raw)?;
        Self::check_non_negative("production_time", value)
    }

    /// 解析 "名称=值"
    ///
    /// 以最后一个 '=' 分割，名称与值均去空白且非空
    pub fn parse_assignment(raw: &str) -> ApiResult<(String, String)> {
        let bad = || {
            ApiError::InvalidInput(t_with_args(
                "validation.bad_assignment",
                &[("value", raw.trim())],
            ))
        };
        let (name, value) = raw.rsplit_once('=').ok_or_else(bad)?;
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            return Err(bad());
        }
        Ok((name.to_string(), value.to_string()))
    }

    /// 解析工时设置 "区间=人数:分钟"
    pub fn parse_time_setting(raw: &str) -> ApiResult<(SizeBracket, u32, f64)> {
        let (bracket, value) = Self::parse_assignment(raw)?;
        let (workers, minutes) = value.split_once(':').ok_or_else(|| {
            ApiError::InvalidInput(t_with_args(
                "validation.bad_time_setting",
                &[("value", raw.trim())],
            ))
        })?;

        let bracket = Self::parse_bracket(&bracket)?;
        let workers = Self::parse_workers(bracket.label(), workers)?;
        let minutes = Self::parse_minutes(bracket.label(), minutes)?;
        Ok((bracket, workers, minutes))
    }

    /// 校验名称（去空白后非空）
    pub fn validate_name(raw: &str) -> ApiResult<String> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput(t_with_args("validation.empty_name", &[])));
        }
        Ok(name.to_string())
    }
}
