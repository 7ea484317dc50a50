//! 变量操作 (Set / Add / Remove / Delete)
//!
//! 每次调用对一个变量执行一次完整的读-改-写：
//! 读取 → 解码 → 编辑 → 编码 → 持久化 → 同步进程环境 → 广播通知。
//! 进程环境同步与广播都不会让操作失败。

use super::list::EntryList;
use crate::error::{EnvError, Result};
use crate::platform::{EnvMirror, Notifier, ScopeStore, StoreError};
use crate::types::{Action, Position, Scope, apply_case};
use std::fmt;
use tracing::debug;

/// 一次操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Set {
        scope: Scope,
        name: String,
    },
    Added {
        scope: Scope,
        name: String,
        entry: String,
        /// 条目原本已存在，本次只是移动位置
        moved: bool,
        /// 未找到的 -before 锚点
        anchor_missing: Option<String>,
    },
    Removed {
        scope: Scope,
        name: String,
    },
    /// 要移除的条目不存在：静默成功
    NotFound {
        scope: Scope,
        name: String,
        entry: String,
    },
    Deleted {
        scope: Scope,
        name: String,
    },
}

impl Outcome {
    /// 是否为静默的空操作
    #[must_use]
    pub fn is_silent(&self) -> bool {
        matches!(self, Outcome::NotFound { .. })
    }

    /// 锚点缺失警告
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Outcome::Added {
                entry,
                anchor_missing: Some(anchor),
                ..
            } => Some(format!(
                "警告: 未找到 '{}'，已将 '{}' 添加到末尾",
                anchor, entry
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Set { scope, name } => write!(f, "已设置 {}:{}", scope, name),
            Outcome::Added {
                scope,
                name,
                entry,
                moved: true,
                ..
            } => write!(f, "已移动 {} 于 {}:{}", entry, scope, name),
            Outcome::Added { scope, name, .. } => write!(f, "已添加到 {}:{}", scope, name),
            Outcome::Removed { scope, name } => write!(f, "已从 {}:{} 移除", scope, name),
            Outcome::NotFound { .. } => Ok(()),
            Outcome::Deleted { scope, name } => write!(f, "已删除 {}:{}", scope, name),
        }
    }
}

/// 绑定到单个作用域的变量操作
pub struct VariableOps<'a> {
    scope: Scope,
    store: &'a dyn ScopeStore,
    mirror: &'a dyn EnvMirror,
    notifier: &'a dyn Notifier,
}

impl<'a> VariableOps<'a> {
    pub fn new(
        scope: Scope,
        store: &'a dyn ScopeStore,
        mirror: &'a dyn EnvMirror,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            scope,
            store,
            mirror,
            notifier,
        }
    }

    /// 覆盖整个值，不经过列表编辑
    pub fn set(&self, name: &str, value: &str, upper: bool) -> Result<Outcome> {
        let value = apply_case(value, upper);
        self.persist(Action::Set, name, &value)?;

        Ok(Outcome::Set {
            scope: self.scope,
            name: name.to_string(),
        })
    }

    /// 添加条目；已存在时移动到新位置
    pub fn add(&self, name: &str, entry: &str, upper: bool, position: &Position) -> Result<Outcome> {
        let entry = apply_case(entry, upper);

        let mut list = EntryList::decode(&self.load(Action::Add, name)?);
        let report = list.add(&entry, position);
        debug!(?report, "{} 编辑后共 {} 个条目", name, list.len());

        self.persist(Action::Add, name, &list.encode())?;

        let anchor_missing = match position {
            Position::Before(anchor) if report.anchor_missing => Some(anchor.clone()),
            _ => None,
        };
        Ok(Outcome::Added {
            scope: self.scope,
            name: name.to_string(),
            entry,
            moved: report.existed,
            anchor_missing,
        })
    }

    /// 移除条目；条目不存在时不写入、不通知，返回 `NotFound`
    pub fn remove(&self, name: &str, entry: &str) -> Result<Outcome> {
        let mut list = EntryList::decode(&self.load(Action::Remove, name)?);

        if !list.remove(entry) {
            debug!("{} 中没有 {}，无需移除", name, entry);
            return Ok(Outcome::NotFound {
                scope: self.scope,
                name: name.to_string(),
                entry: entry.to_string(),
            });
        }

        self.persist(Action::Remove, name, &list.encode())?;

        Ok(Outcome::Removed {
            scope: self.scope,
            name: name.to_string(),
        })
    }

    /// 删除整个变量
    pub fn delete(&self, name: &str) -> Result<Outcome> {
        let existed = self
            .store
            .delete(name)
            .map_err(|e| EnvError::store(Action::Delete, name, e))?;
        if !existed {
            return Err(EnvError::store(
                Action::Delete,
                name,
                StoreError::Missing(name.to_string()),
            ));
        }

        self.mirror.remove(name);
        self.notifier.notify(name);

        Ok(Outcome::Deleted {
            scope: self.scope,
            name: name.to_string(),
        })
    }

    /// 读取当前值；变量不存在时先创建为空字符串
    fn load(&self, action: Action, name: &str) -> Result<String> {
        let current = self
            .store
            .read(name)
            .map_err(|e| EnvError::store(action, name, e))?;

        match current {
            Some(value) => Ok(value),
            None => {
                debug!("{}:{} 不存在，创建空变量", self.scope, name);
                self.store
                    .write(name, "")
                    .map_err(|e| EnvError::store(action, name, e))?;
                Ok(String::new())
            }
        }
    }

    /// 先持久化，再同步进程环境，最后广播
    fn persist(&self, action: Action, name: &str, value: &str) -> Result<()> {
        self.store
            .write(name, value)
            .map_err(|e| EnvError::store(action, name, e))?;
        debug!("{}:{} 已写入 {}", self.scope, name, self.store.describe());

        self.mirror.set(name, value);
        self.notifier.notify(name);
        Ok(())
    }
}
