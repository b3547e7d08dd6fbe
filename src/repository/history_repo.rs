// ==========================================
// 焊接工时计算系统 - 计算历史数据仓储
// ==========================================
// 表: calculation (主表) + calculation_meter (方法米数，级联删除)
// 约束: 每次操作独立打开连接，作用域结束即释放
// 约束: 所有查询使用参数化
// 红线: Repository 不含业务逻辑（偏差由调用方计算后传入）
// ==========================================

use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::domain::{HistoryRecord, SizeBracket};
use crate::exporter::workbook::write_history_workbook;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// created_at 存储格式（定宽，字典序 = 时间序）
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// ==========================================
// HistoryStore - 计算历史仓储
// ==========================================
#[derive(Debug, Clone)]
pub struct HistoryStore {
    db_path: PathBuf,
}

impl HistoryStore {
    /// 打开历史库并确保 schema 存在
    pub fn open<P: AsRef<Path>>(db_path: P) -> RepositoryResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self { db_path };
        let conn = store.connect()?;
        init_schema(&conn)?;

        match read_schema_version(&conn)? {
            Some(v) if v > CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    found = v,
                    expected = CURRENT_SCHEMA_VERSION,
                    "历史库 schema 版本高于当前程序"
                );
            }
            _ => {}
        }

        tracing::info!(path = %store.db_path.display(), "历史库已就绪");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> RepositoryResult<Connection> {
        open_sqlite_connection(&self.db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))
    }

    /// 新增计算记录
    ///
    /// # 参数
    /// - meters_by_method: 方法 → 米数；仅写入 > 0 的条目
    ///
    /// # 返回
    /// - Ok(i64): 新记录 id
    ///
    /// # 说明
    /// - 主表与米数子表在同一事务中写入
    /// - deviation 在新增时恒为 NULL
    pub fn add_entry(
        &self,
        code: &str,
        group_name: &str,
        bracket: SizeBracket,
        meters_by_method: &BTreeMap<String, f64>,
        total_time: f64,
        production_time: Option<f64>,
    ) -> RepositoryResult<i64> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let created_at = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
        tx.execute(
            r#"
            INSERT INTO calculation (
                code, created_at, group_name, bracket,
                total_time, production_time, deviation
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)
            "#,
            params![
                code,
                created_at,
                group_name,
                bracket.label(),
                total_time,
                production_time,
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO calculation_meter (calculation_id, method, meters) VALUES (?1, ?2, ?3)",
            )?;
            for (method, meters) in meters_by_method {
                if *meters > 0.0 {
                    stmt.execute(params![id, method, meters])?;
                }
            }
        }

        tx.commit()?;
        tracing::debug!(id, code, "计算记录已写入");
        Ok(id)
    }

    /// 回填生产工时与偏差
    ///
    /// # 返回
    /// - Ok(()): 已更新
    /// - Err(NotFound): id 不存在
    pub fn update_production_time(
        &self,
        id: i64,
        production_time: f64,
        deviation: Option<f64>,
    ) -> RepositoryResult<()> {
        let conn = self.connect()?;
        let affected = conn.execute(
            "UPDATE calculation SET production_time = ?1, deviation = ?2 WHERE id = ?3",
            params![production_time, deviation, id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "calculation".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除计算记录（米数子表级联删除）
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): id 不存在
    pub fn delete_entry(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM calculation WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// 按 id 查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<HistoryRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                r#"
                SELECT id, code, created_at, group_name, bracket,
                       total_time, production_time, deviation
                FROM calculation
                WHERE id = ?1
                "#,
                params![id],
                map_header,
            )
            .optional()?;

        match record {
            Some(mut record) => {
                record.meters = load_meters(&conn, record.id)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// 查询全部记录（最新在前）
    pub fn list_all(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, code, created_at, group_name, bracket,
                   total_time, production_time, deviation
            FROM calculation
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let mut records = stmt
            .query_map([], map_header)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for record in records.iter_mut() {
            record.meters = load_meters(&conn, record.id)?;
        }

        Ok(records)
    }

    /// 导出为 Excel（汇总表 + 米数明细表）
    ///
    /// # 返回
    /// - Ok(true): 已导出
    /// - Ok(false): 无数据，不生成文件
    pub fn export_to_spreadsheet<P: AsRef<Path>>(&self, path: P) -> RepositoryResult<bool> {
        let records = self.list_all()?;
        if records.is_empty() {
            tracing::info!("历史记录为空，跳过导出");
            return Ok(false);
        }

        let rows = write_history_workbook(&records, path.as_ref())?;
        tracing::info!(rows, path = %path.as_ref().display(), "历史记录已导出");
        Ok(true)
    }
}

fn map_header(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let bracket_label: String = row.get(4)?;
    let bracket = SizeBracket::from_label(&bracket_label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("未知尺寸区间: {}", bracket_label).into(),
        )
    })?;

    Ok(HistoryRecord {
        id: row.get(0)?,
        code: row.get(1)?,
        created_at: row.get::<_, NaiveDateTime>(2)?,
        group_name: row.get(3)?,
        bracket,
        total_time: row.get(5)?,
        production_time: row.get(6)?,
        deviation: row.get(7)?,
        meters: BTreeMap::new(),
    })
}

fn load_meters(conn: &Connection, calculation_id: i64) -> RepositoryResult<BTreeMap<String, f64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT method, meters FROM calculation_meter WHERE calculation_id = ?1 ORDER BY id",
    )?;
    let meters = stmt
        .query_map(params![calculation_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
    Ok(meters)
}
