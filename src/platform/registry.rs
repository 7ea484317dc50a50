//! Windows 注册表存储
//!
//! - User: HKEY_CURRENT_USER\Environment
//! - System: HKEY_LOCAL_MACHINE\SYSTEM\CurrentControlSet\Control\Session Manager\Environment

use super::store::{ScopeStore, StoreError, StoreResult};
use crate::types::Scope;
use std::io::ErrorKind;
use tracing::debug;
use winreg::RegKey;
use winreg::enums::*;
use winreg::types::ToRegValue;

const USER_ENV_PATH: &str = "Environment";
const SYSTEM_ENV_PATH: &str = "SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Environment";

/// 注册表存储（已打开的 Environment 键）
pub struct RegistryStore {
    scope: Scope,
    key: RegKey,
}

impl RegistryStore {
    /// 以读写权限打开作用域对应的键
    pub fn open(scope: Scope) -> StoreResult<Self> {
        let (root, path) = match scope {
            Scope::User => (RegKey::predef(HKEY_CURRENT_USER), USER_ENV_PATH),
            Scope::System => (RegKey::predef(HKEY_LOCAL_MACHINE), SYSTEM_ENV_PATH),
        };

        let key = root
            .open_subkey_with_flags(path, KEY_READ | KEY_WRITE)
            .map_err(|e| StoreError::Registry(format!("无法打开 {}: {}", path, e)))?;

        Ok(Self { scope, key })
    }

    /// 现有值的类型（用于保留 REG_EXPAND_SZ）
    fn existing_type(&self, name: &str) -> Option<RegType> {
        self.key.get_raw_value(name).ok().map(|v| v.vtype)
    }
}

impl ScopeStore for RegistryStore {
    fn read(&self, name: &str) -> StoreResult<Option<String>> {
        match self.key.get_value::<String, _>(name) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Registry(e.to_string())),
        }
    }

    fn write(&self, name: &str, value: &str) -> StoreResult<()> {
        let reg_value = value.to_reg_value();
        let result = match self.existing_type(name) {
            Some(REG_EXPAND_SZ) => {
                debug!("{} 保持 REG_EXPAND_SZ 类型", name);
                self.key.set_raw_value(
                    name,
                    &winreg::RegValue {
                        vtype: REG_EXPAND_SZ,
                        ..reg_value
                    },
                )
            }
            _ => self.key.set_raw_value(name, &reg_value),
        };
        result.map_err(|e| StoreError::Registry(e.to_string()))
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        match self.key.delete_value(name) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Registry(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        match self.scope {
            Scope::User => format!("HKEY_CURRENT_USER\\{}", USER_ENV_PATH),
            Scope::System => format!("HKEY_LOCAL_MACHINE\\{}", SYSTEM_ENV_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// 测试结束时删除临时值
    struct TempValue<'a> {
        store: &'a RegistryStore,
        name: String,
    }

    impl<'a> TempValue<'a> {
        fn new(store: &'a RegistryStore, name: &str) -> Self {
            let name = format!("{}_{}", name, std::process::id());
            let _ = store.key.delete_value(&name);
            Self { store, name }
        }
    }

    impl Drop for TempValue<'_> {
        fn drop(&mut self) {
            let _ = self.store.key.delete_value(&self.name);
        }
    }

    fn user_store() -> RegistryStore {
        RegistryStore::open(Scope::User).unwrap()
    }

    #[test]
    #[serial]
    fn test_new_value_is_reg_sz() {
        let store = user_store();
        let var = TempValue::new(&store, "SETXX_REG_NEW");

        store.write(&var.name, "C:\\A;C:\\B").unwrap();

        assert!(matches!(store.existing_type(&var.name), Some(REG_SZ)));
        assert_eq!(store.read(&var.name).unwrap(), Some("C:\\A;C:\\B".to_string()));
    }

    #[test]
    #[serial]
    fn test_rewrite_keeps_reg_expand_sz() {
        let store = user_store();
        let var = TempValue::new(&store, "SETXX_REG_EXPAND");

        let initial = winreg::RegValue {
            vtype: REG_EXPAND_SZ,
            ..("%USERPROFILE%\\bin").to_reg_value()
        };
        store.key.set_raw_value(&var.name, &initial).unwrap();

        store.write(&var.name, "%USERPROFILE%\\bin;C:\\Tools").unwrap();

        assert!(matches!(store.existing_type(&var.name), Some(REG_EXPAND_SZ)));
        let raw: String = store.key.get_value(&var.name).unwrap();
        assert_eq!(raw, "%USERPROFILE%\\bin;C:\\Tools");
    }

    #[test]
    #[serial]
    fn test_delete_absent_value_returns_false() {
        let store = user_store();
        let var = TempValue::new(&store, "SETXX_REG_ABSENT");

        assert_eq!(store.read(&var.name).unwrap(), None);
        assert!(!store.delete(&var.name).unwrap());

        store.write(&var.name, "x").unwrap();
        assert!(store.delete(&var.name).unwrap());
        assert_eq!(store.read(&var.name).unwrap(), None);
    }

    #[test]
    fn test_describe_user_key() {
        assert_eq!(user_store().describe(), "HKEY_CURRENT_USER\\Environment");
    }
}
