// ==========================================
// 计算历史集成测试
// ==========================================
// 测试目标: 写入 / 回填 / 级联删除 / 排序
// ==========================================

mod test_helpers;

use std::collections::BTreeMap;
use test_helpers::*;
use welding_time::db::open_sqlite_connection;
use welding_time::domain::SizeBracket;
use welding_time::repository::RepositoryError;

fn meters(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn count_meter_rows(env: &TestEnv, id: i64) -> i64 {
    let conn = open_sqlite_connection(&env.db_path).unwrap();
    conn.query_row(
        "SELECT COUNT(*) FROM calculation_meter WHERE calculation_id = ?1",
        [id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn test_delete_cascades_to_meter_rows() {
    let env = TestEnv::new();
    let history = env.history();

    let id = history
        .add_entry(
            VALID_CODE,
            "Koła",
            SizeBracket::From2To20,
            &meters(&[(ZEMAT, 10.0), (SEAMTEC, 5.0)]),
            52.5,
            None,
        )
        .unwrap();
    let other = history
        .add_entry(
            "999-0000-111",
            "Box",
            SizeBracket::UpTo2,
            &meters(&[(ZEMAT, 1.0)]),
            2.0,
            None,
        )
        .unwrap();
    assert_eq!(count_meter_rows(&env, id), 2);

    assert!(history.delete_entry(id).unwrap());
    assert_eq!(count_meter_rows(&env, id), 0);
    assert_eq!(count_meter_rows(&env, other), 1);

    let ids: Vec<i64> = history.list_all().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![other]);
    assert!(!history.delete_entry(id).unwrap());
}

#[test]
fn test_list_is_newest_first_across_reopen() {
    let env = TestEnv::new();
    let mut ids = Vec::new();
    for i in 0..3i32 {
        let history = env.history();
        ids.push(
            history
                .add_entry(
                    VALID_CODE,
                    "Koła",
                    SizeBracket::From2To20,
                    &meters(&[(ZEMAT, f64::from(i + 1))]),
                    3.0 * f64::from(i + 1),
                    None,
                )
                .unwrap(),
        );
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    let records = env.history().list_all().unwrap();
    let listed: Vec<i64> = records.iter().map(|r| r.id).collect();
    ids.reverse();
    assert_eq!(listed, ids);
    assert_eq!(records[0].meters.get(ZEMAT), Some(&3.0));
}

#[test]
fn test_update_production_time_only_touches_target() {
    let env = TestEnv::new();
    let history = env.history();
    let a = history
        .add_entry(VALID_CODE, "Koła", SizeBracket::UpTo2, &meters(&[(ZEMAT, 1.0)]), 2.0, None)
        .unwrap();
    let b = history
        .add_entry(VALID_CODE, "Koła", SizeBracket::UpTo2, &meters(&[(ZEMAT, 2.0)]), 4.0, None)
        .unwrap();

    history.update_production_time(a, 2.2, Some(10.0)).unwrap();

    let a = history.find_by_id(a).unwrap().unwrap();
    let b = history.find_by_id(b).unwrap().unwrap();
    assert_eq!(a.production_time, Some(2.2));
    assert_eq!(a.deviation, Some(10.0));
    assert!(a.is_validated());
    assert_eq!(b.production_time, None);
    assert_eq!(b.deviation, None);
}

#[test]
fn test_update_missing_entry_is_not_found() {
    let env = TestEnv::new();
    let history = env.history();
    let err = history.update_production_time(404, 1.0, None).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}
