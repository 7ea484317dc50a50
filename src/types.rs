//! 核心数据结构定义 (表达原则：用数据结构表达逻辑)

use std::fmt;

/// 变量作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// 当前用户 (HKCU\Environment)
    #[default]
    User,
    /// 整机 (HKLM\...\Session Manager\Environment)，写入需要提权
    System,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Scope {
    /// 输出中使用的标签
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Scope::User => "USER",
            Scope::System => "SYSTEM",
        }
    }

    /// 文件存储使用的文件名
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Scope::User => "user.env",
            Scope::System => "system.env",
        }
    }
}

/// 一次调用执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// 覆盖整个值
    Set,
    /// 向列表变量添加（或移动）条目
    Add,
    /// 从列表变量移除条目
    Remove,
    /// 删除整个变量
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Set => "设置",
            Action::Add => "添加到",
            Action::Remove => "移除自",
            Action::Delete => "删除",
        };
        f.write_str(s)
    }
}

impl Action {
    /// 配置中使用的名称
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Set => "set",
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Delete => "delete",
        }
    }

    /// 从配置中的名称解析
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "set" => Some(Action::Set),
            "add" => Some(Action::Add),
            "remove" => Some(Action::Remove),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

/// 条目插入位置
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Position {
    /// 末尾（默认）
    #[default]
    Append,
    /// 开头 (-top)
    Prepend,
    /// 指定条目之前 (-before)
    Before(String),
}

/// 按需转为大写 (-upper)
#[must_use]
pub fn apply_case(value: &str, upper: bool) -> String {
    if upper {
        value.to_uppercase()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_labels() {
        assert_eq!(Scope::User.to_string(), "USER");
        assert_eq!(Scope::System.to_string(), "SYSTEM");
        assert_eq!(Scope::default(), Scope::User);
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(Action::parse("Set"), Some(Action::Set));
        assert_eq!(Action::parse("delete"), Some(Action::Delete));
        assert_eq!(Action::parse("rename"), None);
        assert_eq!(Action::parse(Action::Remove.name()), Some(Action::Remove));
    }

    #[test]
    fn test_apply_case() {
        assert_eq!(apply_case(".py", true), ".PY");
        assert_eq!(apply_case(".py", false), ".py");
    }
}
