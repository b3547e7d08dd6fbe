// ==========================================
// 焊接工时计算系统 - 历史记录 Excel 导出
// ==========================================
// 汇总表: ID / 代码 / 时间 / 产品组 / 区间 / 计算工时 / 生产工时 / 偏差
// 明细表: ID × 全部出现过的方法 (并集，按名称排序)，缺失填 0.0
// 空值: 生产工时、偏差为 NULL 时留空单元格
// ==========================================

use crate::domain::HistoryRecord;
use crate::exporter::error::{ExportError, ExportResult};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::BTreeSet;
use std::path::Path;

pub const SUMMARY_SHEET: &str = "Podsumowanie";
pub const DETAIL_SHEET: &str = "Metry";

pub const SUMMARY_HEADERS: [&str; 8] = [
    "ID",
    "Kod",
    "Data",
    "Grupa",
    "Przedział",
    "Czas total [min]",
    "Czas produkcji [min]",
    "Odchylenie [%]",
];

/// 明细表方法列（全部记录的方法并集，排序）
pub fn method_columns(records: &[HistoryRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.meters.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 写出历史工作簿
///
/// # 返回
/// - Ok(usize): 写出的记录数
/// - Err(NoData): 记录为空（不生成文件）
pub fn write_history_workbook(records: &[HistoryRecord], path: &Path) -> ExportResult<usize> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)?;
    write_summary_sheet(summary, records, &header_format)?;

    let detail = workbook.add_worksheet();
    detail.set_name(DETAIL_SHEET)?;
    write_detail_sheet(detail, records, &header_format)?;

    workbook.save(path)?;
    Ok(records.len())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    records: &[HistoryRecord],
    header_format: &Format,
) -> ExportResult<()> {
    for (col, title) in SUMMARY_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header_format)?;
    }
    sheet.set_column_width(2, 20)?;
    sheet.set_column_width(3, 20)?;
    sheet.set_column_width(4, 16)?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, record.id as f64)?;
        sheet.write_string(row, 1, record.code.as_str())?;
        sheet.write_string(
            row,
            2,
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        )?;
        sheet.write_string(row, 3, record.group_name.as_str())?;
        sheet.write_string(row, 4, record.bracket.label())?;
        sheet.write_number(row, 5, record.total_time)?;
        if let Some(production_time) = record.production_time {
            sheet.write_number(row, 6, production_time)?;
        }
        if let Some(deviation) = record.deviation {
            sheet.write_number(row, 7, deviation)?;
        }
    }

    Ok(())
}

fn write_detail_sheet(
    sheet: &mut Worksheet,
    records: &[HistoryRecord],
    header_format: &Format,
) -> ExportResult<()> {
    let methods = method_columns(records);

    sheet.write_string_with_format(0, 0, "ID", header_format)?;
    for (j, method) in methods.iter().enumerate() {
        let col = (j + 1) as u16;
        sheet.write_string_with_format(0, col, method.as_str(), header_format)?;
        sheet.set_column_width(col, 24)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, record.id as f64)?;
        for (j, method) in methods.iter().enumerate() {
            let meters = record.meters.get(method).copied().unwrap_or(0.0);
            sheet.write_number(row, (j + 1) as u16, meters)?;
        }
    }

    Ok(())
}
