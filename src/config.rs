//! 配置管理
//!
//! 数据目录：`$SETXX_HOME`，未设置时为 `~/.setxx`。
//! 目录下可选的 `config.toml`：
//!
//! ```toml
//! [store]
//! backend = "auto"      # auto | registry | file
//!
//! [confirm]
//! patterns = ["PATH"]   # 变量名正则（不区分大小写）
//! actions = ["set", "delete"]
//!
//! [notify]
//! timeout_ms = 5000
//!
//! [demo]
//! delay_ms = 1000
//! ```

use crate::error::{EnvError, Result};
use crate::platform::Backend;
use crate::policy::{ConfirmPolicy, ConfirmRule, DEFAULT_ACTIONS};
use crate::types::Action;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 覆盖数据目录的环境变量
pub const HOME_ENV: &str = "SETXX_HOME";

/// 配置文件名
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub confirm: ConfirmSettings,
    pub notify: NotifySettings,
    pub demo: DemoSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    pub backend: Backend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfirmSettings {
    pub patterns: Vec<String>,
    /// 需要确认的动作：set / add / remove / delete
    pub actions: Vec<String>,
}

impl Default for ConfirmSettings {
    fn default() -> Self {
        Self {
            patterns: vec!["PATH".to_string()],
            actions: DEFAULT_ACTIONS.iter().map(|a| a.name().to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifySettings {
    /// 广播等待上限（毫秒）
    pub timeout_ms: u64,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoSettings {
    /// 打开演示窗口前的等待（毫秒）
    pub delay_ms: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

impl AppConfig {
    /// 从数据目录加载配置，文件不存在时使用默认值
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|e| match e {
            EnvError::Config(msg) => EnvError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// 解析并校验配置内容
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| EnvError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.store.backend.is_supported() {
            return Err(EnvError::Config(format!(
                "当前平台不支持存储后端 '{}'",
                self.store.backend
            )));
        }
        self.confirm_policy().map(|_| ())
    }

    /// 由配置构建确认策略
    pub fn confirm_policy(&self) -> Result<ConfirmPolicy> {
        let actions = self
            .confirm
            .actions
            .iter()
            .map(|name| {
                Action::parse(name)
                    .ok_or_else(|| EnvError::Config(format!("未知的确认动作 '{}'", name)))
            })
            .collect::<Result<Vec<_>>>()?;

        let rules = self
            .confirm
            .patterns
            .iter()
            .map(|p| ConfirmRule::new(p, &actions))
            .collect::<Result<Vec<_>>>()?;
        Ok(ConfirmPolicy::new(rules))
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify.timeout_ms)
    }

    pub fn demo_delay(&self) -> Duration {
        Duration::from_millis(self.demo.delay_ms)
    }
}

/// 数据目录：$SETXX_HOME 或 ~/.setxx
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(".setxx"))
        .ok_or_else(|| EnvError::Config("无法确定用户主目录".to_string()))
}
