//! 错误处理模块 (修复原则：明确抛出异常)

use crate::platform::store::StoreError;
use crate::types::Action;
use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("用法错误: {0}")]
    Usage(String),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("{action} {name} 失败: {source}")]
    Store {
        action: Action,
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("操作已取消")]
    Cancelled,

    #[error("配置错误: {0}")]
    Config(String),

    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 详细的错误报告函数 (透明原则)
impl EnvError {
    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            eprintln!("❌ 错误: {}", self);

            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            match self {
                EnvError::Usage(msg) => eprintln!("错误: {}", msg),
                EnvError::Cancelled => eprintln!("操作已取消。"),
                _ => eprintln!("错误: {}", self),
            }
        }
    }

    /// 包装存储层错误，带上动作与变量名
    pub fn store(action: Action, name: &str, source: StoreError) -> Self {
        EnvError::Store {
            action,
            name: name.to_string(),
            source,
        }
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, EnvError>;
