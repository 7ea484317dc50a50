//! 基于文件的作用域存储
//!
//! 每个作用域一个文件（`user.env` / `system.env`），格式：
//! - 每行一个 `NAME=VALUE`，按第一个 `=` 切分
//! - 忽略空行和以 # 开头的注释行
//! - VALUE 原样保存，不做 trim，不支持换行

use super::store::{ScopeStore, StoreError, StoreResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 文件存储
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载全部变量，保持文件中的顺序
    fn load(&self) -> StoreResult<Vec<(String, String)>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        parse(&content)
    }

    fn save(&self, vars: &[(String, String)]) -> StoreResult<()> {
        write_file_safe(&self.path, &serialize(vars))?;
        debug!("已写入 {}", self.path.display());
        Ok(())
    }
}

impl ScopeStore for FileStore {
    fn read(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v))
    }

    fn write(&self, name: &str, value: &str) -> StoreResult<()> {
        validate(name, value)?;

        let mut vars = self.load()?;
        match vars.iter_mut().find(|(k, _)| k == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => vars.push((name.to_string(), value.to_string())),
        }
        self.save(&vars)
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        let vars = self.load()?;
        let remaining: Vec<_> = vars.iter().filter(|(k, _)| k != name).cloned().collect();

        if remaining.len() == vars.len() {
            return Ok(false);
        }
        self.save(&remaining)?;
        Ok(true)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn validate(name: &str, value: &str) -> StoreResult<()> {
    if name.is_empty() || name.contains(['=', '\n', '\r']) || name.trim_start().starts_with('#')
    {
        return Err(StoreError::InvalidValue(format!("变量名 '{}' 无法保存", name)));
    }
    if value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidValue(format!(
            "{} 的值包含换行符",
            name
        )));
    }
    Ok(())
}

/// 解析存储文件内容
fn parse(content: &str) -> StoreResult<Vec<(String, String)>> {
    let mut vars = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                vars.push((key.to_string(), value.to_string()));
            }
            _ => {
                return Err(StoreError::Parse(format!(
                    "第 {} 行格式无效: '{}'",
                    line_num + 1,
                    line
                )));
            }
        }
    }

    Ok(vars)
}

fn serialize(vars: &[(String, String)]) -> String {
    let mut out = String::new();
    for (k, v) in vars {
        out.push_str(k);
        out.push('=');
        out.push_str(v);
        out.push('\n');
    }
    out
}

/// 安全写入文件 (使用临时文件 + 原子替换)
fn write_file_safe(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)?;

    Ok(())
}
