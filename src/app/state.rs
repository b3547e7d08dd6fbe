// ==========================================
// 焊接工时计算系统 - 应用状态
// ==========================================
// 职责: 按配置构造并持有两个存储，向命令层分发 API 实例
// 约束: 无全局单例；关闭时仅补写未落盘的修改
// ==========================================

use crate::api::{ApiResult, CalculationApi, GroupApi, HistoryApi};
use crate::config::AppConfig;
use crate::i18n;
use crate::repository::{DataStore, HistoryStore};

/// 应用状态
pub struct AppState {
    pub config: AppConfig,
    pub data_store: DataStore,
    pub history: HistoryStore,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 设置界面语言
    /// 2. 加载产品组数据文件（失败回退到默认数据）
    /// 3. 打开历史库并建表
    pub fn new(config: AppConfig) -> ApiResult<Self> {
        tracing::info!(
            data_file = %config.data_file.display(),
            history_db = %config.history_db.display(),
            locale = %config.locale,
            "初始化AppState"
        );

        i18n::set_locale(&config.locale);
        let data_store = DataStore::open(&config.data_file);
        let history = HistoryStore::open(&config.history_db)?;

        Ok(Self {
            config,
            data_store,
            history,
        })
    }

    pub fn calculation_api(&self) -> CalculationApi {
        CalculationApi::new(self.history.clone())
    }

    pub fn history_api(&self) -> HistoryApi {
        HistoryApi::new(self.history.clone())
    }

    pub fn group_api(&mut self) -> GroupApi<'_> {
        GroupApi::new(&mut self.data_store)
    }

    /// 关闭前补写未落盘的修改
    ///
    /// 无修改时不写文件，损坏的数据文件保持原样
    pub fn close(mut self) -> ApiResult<()> {
        self.data_store.flush()?;
        tracing::info!("AppState已关闭");
        Ok(())
    }
}
