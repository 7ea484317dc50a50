//! 当前进程环境同步
//!
//! 持久化成功后把新值同步到当前进程环境，使随后启动的子进程（如 -demo 窗口）
//! 立即可见。同步失败不影响操作结果。

use tracing::{debug, warn};

/// 进程环境镜像接口
pub trait EnvMirror {
    fn set(&self, name: &str, value: &str);
    fn remove(&self, name: &str);
}

/// 写入当前进程环境
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

/// 进程环境能否容纳该变量名
fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['=', '\0'])
}

impl EnvMirror for ProcessEnv {
    fn set(&self, name: &str, value: &str) {
        if !valid_name(name) || value.contains('\0') {
            warn!("无法同步 {} 到当前进程环境，已跳过", name);
            return;
        }
        // SAFETY: 单线程 CLI，同步发生时没有其他线程读取环境
        unsafe {
            std::env::set_var(name, value);
        }
        debug!("已同步 {} 到当前进程环境", name);
    }

    fn remove(&self, name: &str) {
        if !valid_name(name) {
            warn!("无法从当前进程环境移除 {}，已跳过", name);
            return;
        }
        // SAFETY: 同上
        unsafe {
            std::env::remove_var(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::EnvGuard;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_process_env_set_and_remove() {
        let guard = EnvGuard::new();
        ProcessEnv.set("SETXX_MIRROR_TEST", "a;b");
        assert_eq!(guard.get_var("SETXX_MIRROR_TEST"), Some("a;b".to_string()));

        ProcessEnv.remove("SETXX_MIRROR_TEST");
        assert!(!guard.contains_var("SETXX_MIRROR_TEST"));
    }

    #[test]
    #[serial]
    fn test_invalid_names_are_skipped() {
        let guard = EnvGuard::new();
        ProcessEnv.set("BAD=NAME", "x");
        ProcessEnv.set("", "x");
        ProcessEnv.set("SETXX_NUL_TEST", "a\0b");
        ProcessEnv.remove("BAD=NAME");
        assert!(!guard.contains_var("SETXX_NUL_TEST"));
    }
}
