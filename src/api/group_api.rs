// ==========================================
// 焊接工时计算系统 - 产品组管理 API
// ==========================================
// 职责: 按名称定位组/方法，校验输入后调用 DataStore 变更
// 返回约定:
// - Ok(true): 已修改并落盘
// - Ok(false): 重名，未修改
// - Err(NotFound): 组或方法不存在
// - Err(StorageError): 落盘失败（内存已修改）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::InputValidator;
use crate::domain::{ProductGroup, SizeBracket, CANONICAL_METHODS};
use crate::i18n::t_with_args;
use crate::repository::DataStore;

pub struct GroupApi<'a> {
    store: &'a mut DataStore,
}

impl<'a> GroupApi<'a> {
    pub fn new(store: &'a mut DataStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> &[ProductGroup] {
        self.store.groups()
    }

    fn group_index(&self, name: &str) -> ApiResult<usize> {
        self.store.find_group_index(name).ok_or_else(|| {
            ApiError::NotFound(t_with_args(
                "validation.unknown_group",
                &[("value", name.trim())],
            ))
        })
    }

    fn method_index(&self, group_index: usize, method: &str) -> ApiResult<usize> {
        let group = self
            .store
            .group(group_index)
            .ok_or_else(|| ApiError::InternalError(format!("产品组索引越界: {}", group_index)))?;
        let trimmed = method.trim();
        let lowered = trimmed.to_lowercase();
        group
            .method_index(trimmed)
            .or_else(|| {
                group
                    .methods()
                    .iter()
                    .position(|m| m.name().to_lowercase() == lowered)
            })
            .ok_or_else(|| {
                ApiError::NotFound(t_with_args(
                    "validation.unknown_method",
                    &[("value", trimmed), ("group", &group.name)],
                ))
            })
    }

    // ==========================================
    // 产品组
    // ==========================================

    /// 新增产品组
    ///
    /// # 参数
    /// - methods: 预置的规范方法（大小写不敏感，空 = 空组）
    pub fn add_group(&mut self, name: &str, methods: &[String]) -> ApiResult<bool> {
        let name = InputValidator::validate_name(name)?;

        let mut canonical = Vec::with_capacity(methods.len());
        for method in methods {
            let lowered = method.trim().to_lowercase();
            let found = CANONICAL_METHODS
                .iter()
                .find(|c| c.to_lowercase() == lowered)
                .ok_or_else(|| {
                    ApiError::InvalidInput(t_with_args(
                        "validation.unknown_method",
                        &[("value", method.trim()), ("group", &name)],
                    ))
                })?;
            canonical.push(*found);
        }

        Ok(self.store.add_group_with_methods(&name, &canonical)?)
    }

    /// 新增包含全部规范方法的产品组
    pub fn add_group_with_all_methods(&mut self, name: &str) -> ApiResult<bool> {
        let all: Vec<String> = CANONICAL_METHODS.iter().map(|m| m.to_string()).collect();
        self.add_group(name, &all)
    }

    pub fn remove_group(&mut self, name: &str) -> ApiResult<()> {
        let index = self.group_index(name)?;
        self.store.remove_group(index)?;
        Ok(())
    }

    pub fn rename_group(&mut self, name: &str, new_name: &str) -> ApiResult<bool> {
        let new_name = InputValidator::validate_name(new_name)?;
        let index = self.group_index(name)?;
        Ok(self.store.rename_group(index, &new_name)?)
    }

    // ==========================================
    // 组内方法
    // ==========================================

    pub fn add_method(&mut self, group: &str, method: &str) -> ApiResult<bool> {
        let method = InputValidator::validate_name(method)?;
        let index = self.group_index(group)?;
        Ok(self.store.add_method_to_group(index, &method)?)
    }

    pub fn remove_method(&mut self, group: &str, method: &str) -> ApiResult<()> {
        let group_index = self.group_index(group)?;
        let method_index = self.method_index(group_index, method)?;
        self.store.remove_method_from_group(group_index, method_index)?;
        Ok(())
    }

    pub fn rename_method(&mut self, group: &str, method: &str, new_name: &str) -> ApiResult<bool> {
        let new_name = InputValidator::validate_name(new_name)?;
        let group_index = self.group_index(group)?;
        let method_index = self.method_index(group_index, method)?;
        Ok(self
            .store
            .rename_method_in_group(group_index, method_index, &new_name)?)
    }

    /// 修改方法的区间工时
    pub fn edit_method(
        &mut self,
        group: &str,
        method: &str,
        settings: &[(SizeBracket, u32, f64)],
    ) -> ApiResult<()> {
        for (bracket, workers, minutes) in settings {
            InputValidator::check_workers(bracket.label(), *workers)?;
            InputValidator::check_non_negative(bracket.label(), *minutes)?;
        }
        let group_index = self.group_index(group)?;
        let method_index = self.method_index(group_index, method)?;
        self.store
            .edit_method_in_group(group_index, method_index, settings)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ZEMAT: &str = "HF Duży (ZEMAT)";

    fn store(dir: &TempDir) -> DataStore {
        DataStore::with_defaults(dir.path().join("data.json"))
    }

    #[test]
    fn test_add_group_with_selected_methods() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let mut api = GroupApi::new(&mut store);

        assert!(api
            .add_group("Kubki", &["hf duży (zemat)".to_string()])
            .unwrap());
        let group = api.list().last().unwrap();
        assert_eq!(group.name, "Kubki");
        assert_eq!(group.methods().len(), 1);
        assert_eq!(group.methods()[0].name(), ZEMAT);

        assert!(!api.add_group("kubki", &[]).unwrap());
        assert!(matches!(
            api.add_group("Inne", &["Laser".to_string()]),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(api.add_group("  ", &[]), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_group_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let mut api = GroupApi::new(&mut store);
        assert!(matches!(api.remove_group("Kubki"), Err(ApiError::NotFound(_))));
        assert!(matches!(
            api.remove_method("Koła", "Laser"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_edit_method_validates_values() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        {
            let mut api = GroupApi::new(&mut store);
            assert!(api
                .edit_method("Koła", ZEMAT, &[(SizeBracket::UpTo2, 0, 1.0)])
                .is_err());
            api.edit_method("Koła", ZEMAT, &[(SizeBracket::UpTo2, 2, 4.5)])
                .unwrap();
        }
        let koła = store.group(0).unwrap();
        assert_eq!(koła.methods()[0].get_time(SizeBracket::UpTo2), (2, 4.5));
        // 其他组不受影响
        let box_group = store.group(1).unwrap();
        assert_eq!(box_group.methods()[0].get_time(SizeBracket::UpTo2), (1, 2.0));
    }

    #[test]
    fn test_rename_method_collision() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);
        let mut api = GroupApi::new(&mut store);
        assert!(!api
            .rename_method("Koła", ZEMAT, "HF Mały (WOLDAN)")
            .unwrap());
        assert!(api.rename_method("Koła", ZEMAT, "HF Duży").unwrap());
        assert_eq!(api.list()[0].methods()[0].name(), "HF Duży");
    }
}
