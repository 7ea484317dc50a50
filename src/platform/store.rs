//! 作用域存储接口（输出端口）

use std::cell::RefCell;
use std::collections::BTreeMap;
use thiserror::Error;

/// 存储层错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("注册表错误: {0}")]
    Registry(String),

    #[error("解析错误: {0}")]
    Parse(String),

    #[error("变量不存在: {0}")]
    Missing(String),

    #[error("无效的值: {0}")]
    InvalidValue(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// 单个作用域的键值存储
pub trait ScopeStore {
    /// 读取变量，不存在时返回 `None`
    fn read(&self, name: &str) -> StoreResult<Option<String>>;

    /// 写入（覆盖）变量
    fn write(&self, name: &str, value: &str) -> StoreResult<()>;

    /// 删除变量，返回变量原本是否存在
    fn delete(&self, name: &str) -> StoreResult<bool>;

    /// 存储位置描述（用于调试输出）
    fn describe(&self) -> String;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    vars: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以初始变量创建
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: RefCell::new(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// 直接查看存储内容（不经过自动创建逻辑）
    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.borrow().get(name).cloned()
    }
}

impl ScopeStore for MemoryStore {
    fn read(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.vars.borrow().get(name).cloned())
    }

    fn write(&self, name: &str, value: &str) -> StoreResult<()> {
        self.vars
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        Ok(self.vars.borrow_mut().remove(name).is_some())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStore::with_vars([("A", "1")]);
        assert_eq!(store.read("A").unwrap(), Some("1".to_string()));
        assert_eq!(store.read("a").unwrap(), None);

        store.write("B", "").unwrap();
        assert_eq!(store.get("B"), Some(String::new()));

        assert!(store.delete("A").unwrap());
        assert!(!store.delete("A").unwrap());
    }
}
