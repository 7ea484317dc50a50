//! 平台相关的外部协作者：存储、广播、提权、进程环境、演示窗口

pub mod demo;
pub mod elevation;
pub mod file_store;
pub mod mirror;
pub mod notify;
#[cfg(windows)]
pub mod registry;
pub mod store;

pub use file_store::FileStore;
pub use mirror::{EnvMirror, ProcessEnv};
pub use notify::{BroadcastNotifier, Notifier};
pub use store::{MemoryStore, ScopeStore, StoreError, StoreResult};

use crate::types::Scope;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Windows 用注册表，其他平台用文件
    #[default]
    Auto,
    Registry,
    File,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Auto => write!(f, "auto"),
            Backend::Registry => write!(f, "registry"),
            Backend::File => write!(f, "file"),
        }
    }
}

impl Backend {
    /// 把 `Auto` 落实为当前平台的后端；其余原样返回
    #[must_use]
    pub fn resolve(self) -> Self {
        match self {
            Backend::Auto if cfg!(windows) => Backend::Registry,
            Backend::Auto => Backend::File,
            other => other,
        }
    }

    /// 当前平台是否支持此后端
    #[must_use]
    pub fn is_supported(self) -> bool {
        cfg!(windows) || self.resolve() != Backend::Registry
    }

    /// 写入该作用域是否需要提权（仅注册表的 System 作用域）
    #[must_use]
    pub fn requires_elevation(self, scope: Scope) -> bool {
        self.resolve() == Backend::Registry && scope == Scope::System
    }

    /// 打开作用域存储
    pub fn open(self, scope: Scope, data_dir: &Path) -> StoreResult<Box<dyn ScopeStore>> {
        match self.resolve() {
            #[cfg(windows)]
            Backend::Registry => Ok(Box::new(registry::RegistryStore::open(scope)?)),
            #[cfg(not(windows))]
            Backend::Registry => Err(StoreError::Registry(
                "当前平台不支持注册表存储".to_string(),
            )),
            _ => Ok(Box::new(FileStore::new(data_dir.join(scope.file_name())))),
        }
    }
}
