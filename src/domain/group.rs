// ==========================================
// 焊接工时计算系统 - 产品组领域模型
// ==========================================
// 产品组: 名称 + 有序焊接方法列表 (插入顺序 = 显示顺序)
// 红线: 组内方法实例独立，不跨组共享
// ==========================================

use crate::domain::defaults::CANONICAL_METHODS;
use crate::domain::method::WeldingMethod;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductGroup - 产品组
// ==========================================
// 对齐: 数据文件 {name, methods}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    pub name: String,
    #[serde(default)]
    methods: Vec<WeldingMethod>,
}

impl ProductGroup {
    /// 创建空产品组
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// 创建包含全部 7 种规范方法的产品组
    pub fn with_default_methods(name: impl Into<String>) -> Self {
        let mut group = Self::new(name);
        for method_name in CANONICAL_METHODS {
            group.add_method(WeldingMethod::new(method_name));
        }
        group
    }

    pub fn methods(&self) -> &[WeldingMethod] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> Option<&WeldingMethod> {
        self.methods.get(index)
    }

    pub fn method_mut(&mut self, index: usize) -> Option<&mut WeldingMethod> {
        self.methods.get_mut(index)
    }

    /// 按名称查找方法位置（精确匹配）
    pub fn method_index(&self, name: &str) -> Option<usize> {
        self.methods.iter().position(|m| m.name() == name)
    }

    pub fn contains_method(&self, name: &str) -> bool {
        self.method_index(name).is_some()
    }

    /// 追加方法
    ///
    /// 不检查重名，重名拦截在 DataStore 层完成
    pub fn add_method(&mut self, method: WeldingMethod) {
        self.methods.push(method);
    }

    /// 按位置删除方法，越界时忽略
    pub fn remove_method(&mut self, index: usize) {
        if index < self.methods.len() {
            self.methods.remove(index);
        }
    }

    /// 名称大小写不敏感比较
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
