// ==========================================
// Excel 导出集成测试
// ==========================================
// 测试目标: 计算 → 导出 → 用 calamine 回读两个工作表
// ==========================================

mod test_helpers;

use calamine::{open_workbook, Data, Reader, Xlsx};
use test_helpers::*;
use welding_time::api::ApiError;
use welding_time::exporter::{DETAIL_SHEET, SUMMARY_HEADERS, SUMMARY_SHEET};

fn number(cell: &Data) -> f64 {
    match cell {
        Data::Float(v) => *v,
        Data::Int(v) => *v as f64,
        other => panic!("expected number, got {:?}", other),
    }
}

#[test]
fn test_export_writes_summary_and_meters() {
    let env = TestEnv::new();
    let state = env.app_state();
    let api = state.calculation_api();

    let first = api
        .calculate(&state.data_store, &kola_request().with_meters(ZEMAT, 10.0))
        .unwrap();
    let second = api
        .calculate(
            &state.data_store,
            &kola_request()
                .with_meters(SEAMTEC, 5.0)
                .with_production_time(16.5),
        )
        .unwrap();

    let target = env.path("historia.xlsx");
    state.history_api().export(&target).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&target).unwrap();

    let summary = workbook.worksheet_range(SUMMARY_SHEET).unwrap();
    let rows: Vec<_> = summary.rows().collect();
    assert_eq!(rows.len(), 3);
    for (col, title) in SUMMARY_HEADERS.iter().enumerate() {
        assert_eq!(rows[0][col], Data::String(title.to_string()));
    }
    // 最新在前
    assert_eq!(number(&rows[1][0]) as i64, second.entry_id);
    assert_eq!(number(&rows[1][5]), 15.0);
    assert_eq!(number(&rows[1][6]), 16.5);
    assert!((number(&rows[1][7]) - 10.0).abs() < 1e-9);
    assert_eq!(number(&rows[2][0]) as i64, first.entry_id);
    assert_eq!(rows[2][1], Data::String(VALID_CODE.to_string()));
    assert!(rows[2].get(6).map_or(true, |c| *c == Data::Empty));
    assert!(rows[2].get(7).map_or(true, |c| *c == Data::Empty));

    let detail = workbook.worksheet_range(DETAIL_SHEET).unwrap();
    let rows: Vec<_> = detail.rows().collect();
    assert_eq!(rows[0][0], Data::String("ID".to_string()));
    assert_eq!(rows[0][1], Data::String(SEAMTEC.to_string()));
    assert_eq!(rows[0][2], Data::String(ZEMAT.to_string()));
    assert_eq!(number(&rows[1][1]), 5.0);
    assert_eq!(number(&rows[1][2]), 0.0);
    assert_eq!(number(&rows[2][1]), 0.0);
    assert_eq!(number(&rows[2][2]), 10.0);
}

#[test]
fn test_export_with_empty_history() {
    let env = TestEnv::new();
    let state = env.app_state();
    let target = env.path("empty.xlsx");

    assert!(matches!(
        state.history_api().export(&target),
        Err(ApiError::BusinessRuleViolation(_))
    ));
    assert!(!target.exists());
    assert!(!env.history().export_to_spreadsheet(&target).unwrap());
}
