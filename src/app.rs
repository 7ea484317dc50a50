//! 应用程序容器
//!
//! 负责把配置、存储后端、广播与进程环境组装成一次变量操作

use crate::cli::{Command, Request};
use crate::config::AppConfig;
use crate::editor::{Outcome, VariableOps};
use crate::error::{EnvError, Result};
use crate::platform::{Backend, BroadcastNotifier, ProcessEnv, ScopeStore, demo};
use crate::policy::ConfirmPolicy;
use crate::types::Scope;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 成功后的提示
pub const SUCCESS_HINT: &str =
    "。新打开的终端才能看到变更，嵌套在其他程序中的终端（如 VSCode 内置终端）需要重启其父进程。";

/// 应用程序容器
pub struct Application {
    config: AppConfig,
    data_dir: PathBuf,
}

impl Application {
    pub fn new(config: AppConfig, data_dir: PathBuf) -> Self {
        Self { config, data_dir }
    }

    pub fn backend(&self) -> Backend {
        self.config.store.backend.resolve()
    }

    pub fn confirm_policy(&self) -> Result<ConfirmPolicy> {
        self.config.confirm_policy()
    }

    /// 写入该作用域前是否需要提权
    pub fn requires_elevation(&self, scope: Scope) -> bool {
        self.backend().requires_elevation(scope)
    }

    fn open(&self, request: &Request) -> Result<Box<dyn ScopeStore>> {
        let store = self
            .backend()
            .open(request.scope, &self.data_dir)
            .map_err(|e| EnvError::store(request.action(), &request.name, e))?;
        debug!("{} 存储位置: {}", request.scope, store.describe());
        Ok(store)
    }

    /// 执行请求
    pub fn execute(&self, request: &Request) -> Result<Outcome> {
        let store = self.open(request)?;
        let notifier = BroadcastNotifier::new(self.config.notify_timeout());
        let ops = VariableOps::new(request.scope, store.as_ref(), &ProcessEnv, &notifier);

        let name = request.name.as_str();
        match &request.command {
            Command::Set { value } => ops.set(name, value, request.upper),
            Command::Add { entry, position } => ops.add(name, entry, request.upper, position),
            Command::Remove { entry } => ops.remove(name, entry),
            Command::Delete => ops.delete(name),
        }
    }

    /// -demo：读回存储中的值并展示
    pub fn show_demo(&self, request: &Request) {
        let stored = match self.open(request).and_then(|store| {
            store
                .read(&request.name)
                .map_err(|e| EnvError::store(request.action(), &request.name, e))
        }) {
            Ok(value) => value,
            Err(e) => {
                warn!("无法读取 {} 用于展示: {}", request.name, e);
                None
            }
        };
        demo::show(
            request.scope,
            &request.name,
            stored.as_deref(),
            self.config.demo_delay(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::EnvGuard;
    use crate::types::Position;
    use serial_test::serial;

    fn file_app() -> (tempfile::TempDir, Application) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::parse("[store]\nbackend = \"file\"\n").unwrap();
        let app = Application::new(config, dir.path().to_path_buf());
        (dir, app)
    }

    fn request(scope: Scope, name: &str, command: Command) -> Request {
        Request {
            scope,
            name: name.to_string(),
            command,
            upper: false,
            sure: false,
            demo: false,
        }
    }

    #[test]
    #[serial]
    fn test_execute_against_file_store() {
        let guard = EnvGuard::new();
        let (dir, app) = file_app();

        let add = request(
            Scope::User,
            "SETXX_APP_TEST",
            Command::Add {
                entry: "C:\\A".to_string(),
                position: Position::Append,
            },
        );
        assert_eq!(app.execute(&add).unwrap().to_string(), "已添加到 USER:SETXX_APP_TEST");

        let content = std::fs::read_to_string(dir.path().join("user.env")).unwrap();
        assert_eq!(content, "SETXX_APP_TEST=C:\\A\n");
        assert!(!dir.path().join("system.env").exists());
        assert_eq!(guard.get_var("SETXX_APP_TEST"), Some("C:\\A".to_string()));

        let delete = request(Scope::User, "SETXX_APP_TEST", Command::Delete);
        app.execute(&delete).unwrap();
        assert!(!guard.contains_var("SETXX_APP_TEST"));
        assert!(app.execute(&delete).is_err());
    }

    #[test]
    fn test_file_backend_never_elevates() {
        let (_dir, app) = file_app();
        assert_eq!(app.backend(), Backend::File);
        assert!(!app.requires_elevation(Scope::System));
    }
}
