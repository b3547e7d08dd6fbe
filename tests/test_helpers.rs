// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时目录下的数据文件/历史库，以及常用请求构造
// ==========================================

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;
use welding_time::api::CalculationRequest;
use welding_time::app::AppState;
use welding_time::config::AppConfig;
use welding_time::domain::SizeBracket;
use welding_time::repository::{DataStore, HistoryStore};

pub const ZEMAT: &str = "HF Duży (ZEMAT)";
pub const WOLDAN: &str = "HF Mały (WOLDAN)";
pub const SEAMTEC: &str = "Gorący Klin (SEAMTEC)";
pub const VALID_CODE: &str = "123-4567-890";

/// 测试环境（TempDir 需要保持存活）
pub struct TestEnv {
    pub dir: TempDir,
    pub data_file: PathBuf,
    pub db_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        welding_time::logging::init_test();
        let dir = TempDir::new().expect("create temp dir");
        let data_file = dir.path().join("data").join("welding_data.json");
        let db_path = dir.path().join("data").join("welding_history.db");
        Self {
            dir,
            data_file,
            db_path,
        }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            data_file: self.data_file.clone(),
            history_db: self.db_path.clone(),
            locale: "pl".to_string(),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.config()).expect("open app state")
    }

    pub fn data_store(&self) -> DataStore {
        DataStore::open(&self.data_file)
    }

    pub fn history(&self) -> HistoryStore {
        HistoryStore::open(&self.db_path).expect("open history store")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Koła / od 2 do 20m2 请求
pub fn kola_request() -> CalculationRequest {
    CalculationRequest::new(VALID_CODE, "Koła", SizeBracket::From2To20)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
