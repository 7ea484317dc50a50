//! setxx - 永久环境变量编辑工具
//!
//! 按作用域（用户/系统）写入永久环境变量，并广播变更通知。
//! 以 `;` 分隔的列表变量支持按条目添加、移动、移除。

// 数据结构与错误
pub mod error;
pub mod types;

// 核心：列表编辑与变量操作
pub mod editor;

// 外部协作者：存储、广播、提权
pub mod platform;

// 确认策略与配置
pub mod config;
pub mod policy;

// CLI 定义与应用程序容器
pub mod app;
pub mod cli;

#[cfg(test)]
mod test_utils;

pub use editor::{EntryList, Outcome, VariableOps};
pub use error::{EnvError, Result};
pub use types::{Action, Position, Scope};
