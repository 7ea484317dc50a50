//! 测试工具模块
//!
//! 修改进程环境的测试需配合 `#[serial]` 使用

use std::collections::HashMap;
use std::env;

/// 环境变量守卫 - 释放时恢复进程环境
pub struct EnvGuard {
    original_vars: HashMap<String, String>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    /// 记录当前环境变量
    pub fn new() -> Self {
        let original_vars: HashMap<String, String> = env::vars().collect();
        Self { original_vars }
    }

    /// 设置测试环境变量（自动包装为 unsafe）
    pub fn set_var(&self, key: &str, value: &str) {
        unsafe {
            env::set_var(key, value);
        }
    }

    /// 移除环境变量（自动包装为 unsafe）
    pub fn remove_var(&self, key: &str) {
        unsafe {
            env::remove_var(key);
        }
    }

    pub fn contains_var(&self, key: &str) -> bool {
        env::var(key).is_ok()
    }

    pub fn get_var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // 先移除新增的变量，再恢复被改动的变量
        let current_vars: Vec<String> = env::vars().map(|(k, _)| k).collect();
        for key in current_vars {
            if !self.original_vars.contains_key(&key) {
                self.remove_var(&key);
            }
        }

        for (key, value) in &self.original_vars {
            if env::var(key).as_deref() != Ok(value.as_str()) {
                self.set_var(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_guard_cleanup() {
        {
            let guard = EnvGuard::new();
            guard.set_var("SETXX_GUARD_VAR", "x");
            assert_eq!(guard.get_var("SETXX_GUARD_VAR"), Some("x".to_string()));
        }
        assert!(env::var("SETXX_GUARD_VAR").is_err());
    }
}
