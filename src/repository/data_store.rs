// ==========================================
// 焊接工时计算系统 - 产品组数据仓储 (JSON 文件)
// ==========================================
// 职责: 持有全部产品组；组/方法的增删改；写穿持久化
// 加载策略: 文件不存在或读取/解析失败 → 使用默认 5 组 × 7 方法
//           重名组（大小写不敏感）与组内重名方法只保留第一个
// 红线: 任何修改立即落盘；落盘失败返回 Err，内存状态保留
// ==========================================

use crate::domain::{
    is_canonical_method, ProductGroup, SizeBracket, WeldingMethod, DEFAULT_GROUPS,
};
use crate::repository::error::RepositoryResult;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// ==========================================
// 数据文件结构
// ==========================================
// {"groups": [...], "savedAt": "..."}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataDocument {
    #[serde(default)]
    groups: Vec<ProductGroup>,
    #[serde(default)]
    #[allow(dead_code)]
    saved_at: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DataDocumentRef<'a> {
    groups: &'a [ProductGroup],
    saved_at: String,
}

// ==========================================
// DataStore - 产品组仓储
// ==========================================
#[derive(Debug)]
pub struct DataStore {
    path: PathBuf,
    groups: Vec<ProductGroup>,
    dirty: bool, // 内存中有未落盘的修改
}

impl DataStore {
    /// 打开数据文件
    ///
    /// 不会失败：任何读取问题都回退到默认数据集
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let groups = Self::load(&path);
        tracing::info!(path = %path.display(), groups = groups.len(), "产品组数据已加载");
        Self {
            path,
            groups,
            dirty: false,
        }
    }

    /// 默认数据集（不读文件）
    pub fn with_defaults<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            groups: default_groups(),
            dirty: false,
        }
    }

    fn load(path: &Path) -> Vec<ProductGroup> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "数据文件不存在，使用默认产品组");
            return default_groups();
        }

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "数据文件读取失败，使用默认产品组");
                return default_groups();
            }
        };

        match serde_json::from_str::<DataDocument>(&raw) {
            Ok(document) => dedupe_groups(document.groups),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "数据文件解析失败，使用默认产品组");
                default_groups()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn groups(&self) -> &[ProductGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&ProductGroup> {
        self.groups.get(index)
    }

    /// 按名称查找产品组（大小写不敏感）
    pub fn find_group_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.groups.iter().position(|g| g.has_name(name))
    }

    fn name_taken_by_other(&self, name: &str, except: Option<usize>) -> bool {
        self.groups
            .iter()
            .enumerate()
            .any(|(i, g)| Some(i) != except && g.has_name(name))
    }

    // ==========================================
    // 产品组管理
    // ==========================================

    /// 新增空产品组
    ///
    /// # 返回
    /// - Ok(true): 已新增并落盘
    /// - Ok(false): 名称为空或已存在（大小写不敏感），未做修改
    /// - Err: 落盘失败（内存已修改）
    pub fn add_group(&mut self, name: &str) -> RepositoryResult<bool> {
        self.add_group_with_methods(name, &[])
    }

    /// 新增产品组并预置指定的规范方法
    ///
    /// 未知方法名或重复方法名 → Ok(false)
    pub fn add_group_with_methods(
        &mut self,
        name: &str,
        method_names: &[&str],
    ) -> RepositoryResult<bool> {
        let name = name.trim();
        if name.is_empty() || self.name_taken_by_other(name, None) {
            return Ok(false);
        }

        let mut group = ProductGroup::new(name);
        for method_name in method_names {
            if !is_canonical_method(method_name) || group.contains_method(method_name) {
                tracing::debug!(method = %method_name, "拒绝非规范或重复的方法");
                return Ok(false);
            }
            group.add_method(WeldingMethod::new(*method_name));
        }

        self.groups.push(group);
        self.persist()?;
        Ok(true)
    }

    /// 删除产品组
    pub fn remove_group(&mut self, index: usize) -> RepositoryResult<bool> {
        if index >= self.groups.len() {
            return Ok(false);
        }
        let removed = self.groups.remove(index);
        tracing::info!(group = %removed.name, "产品组已删除");
        self.persist()?;
        Ok(true)
    }

    /// 重命名产品组
    ///
    /// 与其他组重名（大小写不敏感）时拒绝；仅改变自身大小写允许
    pub fn rename_group(&mut self, index: usize, new_name: &str) -> RepositoryResult<bool> {
        let new_name = new_name.trim();
        if index >= self.groups.len()
            || new_name.is_empty()
            || self.name_taken_by_other(new_name, Some(index))
        {
            return Ok(false);
        }
        self.groups[index].name = new_name.to_string();
        self.persist()?;
        Ok(true)
    }

    // ==========================================
    // 组内方法管理
    // ==========================================

    /// 向产品组新增方法（规范方法带默认工时表）
    pub fn add_method_to_group(
        &mut self,
        group_index: usize,
        method_name: &str,
    ) -> RepositoryResult<bool> {
        let method_name = method_name.trim();
        let Some(group) = self.groups.get_mut(group_index) else {
            return Ok(false);
        };
        if method_name.is_empty() || group.contains_method(method_name) {
            return Ok(false);
        }
        group.add_method(WeldingMethod::new(method_name));
        self.persist()?;
        Ok(true)
    }

    /// 从产品组删除方法
    pub fn remove_method_from_group(
        &mut self,
        group_index: usize,
        method_index: usize,
    ) -> RepositoryResult<bool> {
        let Some(group) = self.groups.get_mut(group_index) else {
            return Ok(false);
        };
        if method_index >= group.methods().len() {
            return Ok(false);
        }
        group.remove_method(method_index);
        self.persist()?;
        Ok(true)
    }

    /// 修改方法的区间工时
    ///
    /// # 参数
    /// - new_times: (区间, 人数, 分钟/米) 列表，逐条 set_time
    pub fn edit_method_in_group(
        &mut self,
        group_index: usize,
        method_index: usize,
        new_times: &[(SizeBracket, u32, f64)],
    ) -> RepositoryResult<bool> {
        let Some(method) = self
            .groups
            .get_mut(group_index)
            .and_then(|g| g.method_mut(method_index))
        else {
            return Ok(false);
        };
        for (bracket, workers, minutes_per_meter) in new_times {
            method.set_time(*bracket, *workers, *minutes_per_meter);
        }
        self.persist()?;
        Ok(true)
    }

    /// 重命名组内方法
    pub fn rename_method_in_group(
        &mut self,
        group_index: usize,
        method_index: usize,
        new_name: &str,
    ) -> RepositoryResult<bool> {
        let new_name = new_name.trim();
        let Some(group) = self.groups.get_mut(group_index) else {
            return Ok(false);
        };
        if new_name.is_empty() || method_index >= group.methods().len() {
            return Ok(false);
        }
        if let Some(existing) = group.method_index(new_name) {
            if existing != method_index {
                return Ok(false);
            }
        }
        if let Some(method) = group.method_mut(method_index) {
            method.rename(new_name);
        }
        self.persist()?;
        Ok(true)
    }

    // ==========================================
    // 持久化
    // ==========================================

    /// 写入数据文件（先写临时文件再替换）
    pub fn save(&self) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let document = DataDocumentRef {
            groups: &self.groups,
            saved_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        };

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &document)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "产品组数据已保存");
        Ok(())
    }

    /// 是否有未落盘的修改（上次写穿失败）
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 关闭前落盘
    ///
    /// 仅在存在未落盘修改时写文件；只读使用不会改写数据文件
    pub fn flush(&mut self) -> RepositoryResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    fn persist(&mut self) -> RepositoryResult<()> {
        match self.save() {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                tracing::error!(path = %self.path.display(), error = %e, "产品组数据保存失败，内存状态保留");
                Err(e)
            }
        }
    }
}

/// 加载后去重: 空名组、重名组与组内重名方法被丢弃
fn dedupe_groups(groups: Vec<ProductGroup>) -> Vec<ProductGroup> {
    let mut kept: Vec<ProductGroup> = Vec::with_capacity(groups.len());
    for group in groups {
        let name = group.name.trim();
        if name.is_empty() || kept.iter().any(|g| g.has_name(name)) {
            tracing::warn!(group = %group.name, "数据文件中存在空名或重名产品组，已忽略");
            continue;
        }

        let mut clean = ProductGroup::new(name);
        for method in group.methods() {
            if clean.contains_method(method.name()) {
                tracing::warn!(group = %name, method = %method.name(), "组内存在重名方法，已忽略");
                continue;
            }
            clean.add_method(method.clone());
        }
        kept.push(clean);
    }
    kept
}

/// 默认数据集: 5 个产品组，每组 7 种规范方法
pub fn default_groups() -> Vec<ProductGroup> {
    DEFAULT_GROUPS
        .iter()
        .map(|name| ProductGroup::with_default_methods(*name))
        .collect()
}
