// ==========================================
// 焊接工时计算系统 - 文本报表
// ==========================================
// 职责: 将 API 结果渲染为命令行文本（标签走 i18n）
// 格式: 数值保留两位小数；偏差带符号
// ==========================================

use crate::api::{CalculationOutcome, CalculationRequest, ValidationOutcome};
use crate::domain::{DeviationStatus, HistoryRecord, ProductGroup, SizeBracket};
use crate::i18n::t;
use std::fmt::Write;

fn status_line(out: &mut String, deviation: Option<f64>, status: Option<DeviationStatus>) {
    if let Some(deviation) = deviation {
        let _ = writeln!(out, "{}: {:+.2}%", t("report.deviation"), deviation);
    }
    if let Some(status) = status {
        let _ = writeln!(out, "{}: {}", t("report.status"), t(status.i18n_key()));
    }
}

/// 计算结果报表
pub fn render_calculation(outcome: &CalculationOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", t("report.entry_id"), outcome.entry_id);
    let _ = writeln!(out, "{}: {}", t("report.product_code"), outcome.code);
    let _ = writeln!(out, "{}: {}", t("report.group"), outcome.group_name);
    let _ = writeln!(out, "{}: {}", t("report.bracket"), outcome.bracket);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}:", t("report.details"));

    for result in &outcome.breakdown {
        let _ = writeln!(out, "- {}", result.method);
        let _ = writeln!(out, "    {}: {:.2} m", t("report.meters"), result.meters);
        let _ = writeln!(
            out,
            "    {}: {:.2} min/m",
            t("report.minutes_per_meter"),
            result.minutes_per_meter
        );
        if result.forced {
            let _ = writeln!(
                out,
                "    {}: {} {}",
                t("report.workers"),
                result.workers,
                t("report.forced")
            );
        } else {
            let _ = writeln!(out, "    {}: {}", t("report.workers"), result.workers);
        }
        let _ = writeln!(
            out,
            "    {}: {:.2} min",
            t("report.method_total"),
            result.total_time
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {:.2} min", t("report.grand_total"), outcome.total_time);
    if let Some(production_time) = outcome.production_time {
        let _ = writeln!(out, "{}: {:.2} min", t("report.production_time"), production_time);
    }
    status_line(&mut out, outcome.deviation, outcome.status);
    out
}

/// 生产工时回填报表
pub fn render_validation(outcome: &ValidationOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", t("report.entry_id"), outcome.entry_id);
    let _ = writeln!(out, "{}: {:.2} min", t("report.calculated_time"), outcome.total_time);
    let _ = writeln!(
        out,
        "{}: {:.2} min",
        t("report.production_time"),
        outcome.production_time
    );
    status_line(&mut out, outcome.deviation, outcome.status);
    out
}

/// 历史记录列表（最新在前）
pub fn render_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n", t("history.empty"));
    }

    let mut out = String::new();
    for record in records {
        let _ = write!(
            out,
            "#{} | {} | {} | {} | {} | {:.2} min",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.code,
            record.group_name,
            record.bracket,
            record.total_time,
        );
        if let Some(production_time) = record.production_time {
            let _ = write!(out, " | {:.2} min", production_time);
        }
        if let Some(deviation) = record.deviation {
            let _ = write!(out, " | {:+.2}%", deviation);
        }
        if let Some(status) = record.status() {
            let _ = write!(out, " | {}", t(status.i18n_key()));
        }
        let _ = writeln!(out);
        for (method, meters) in &record.meters {
            let _ = writeln!(out, "    {}: {:.2} m", method, meters);
        }
    }
    out
}

/// 产品组与方法工时表
pub fn render_groups(groups: &[ProductGroup]) -> String {
    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, group.name);
        for (j, method) in group.methods().iter().enumerate() {
            let _ = writeln!(out, "    {}. {}", j + 1, method.name());
            for bracket in SizeBracket::ALL {
                if let Some(entry) = method.time_table().get(&bracket) {
                    let _ = writeln!(
                        out,
                        "        {}: {} × {:.2} min/m",
                        bracket, entry.workers, entry.minutes_per_meter
                    );
                }
            }
        }
    }
    out
}

/// 回填的计算请求（附可直接执行的命令）
pub fn render_request(request: &CalculationRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", t("report.product_code"), request.code);
    let _ = writeln!(out, "{}: {}", t("report.group"), request.group_name);
    let _ = writeln!(out, "{}: {}", t("report.bracket"), request.bracket);
    for (method, meters) in &request.meters {
        let _ = writeln!(out, "    {}: {:.2} m", method, meters);
    }

    let _ = write!(
        out,
        "\nwelding-time calc --code {} --group \"{}\" --bracket \"{}\"",
        request.code, request.group_name, request.bracket
    );
    for (method, meters) in &request.meters {
        let _ = write!(out, " --meters \"{}={}\"", method, meters);
    }
    let _ = writeln!(out);
    out
}
