//! 破坏性操作确认策略
//!
//! 策略表：变量名匹配某条规则的正则，且动作在该规则的动作集合内 → 需要确认，
//! 除非指定了 -sure。

use crate::cli::Request;
use crate::error::{EnvError, Result};
use crate::types::Action;
use regex::{Regex, RegexBuilder};
use std::io::{BufRead, Write};

/// 单条确认规则
#[derive(Debug, Clone)]
pub struct ConfirmRule {
    pattern: Regex,
    actions: Vec<Action>,
}

impl ConfirmRule {
    /// 以不区分大小写的正则创建规则
    pub fn new(pattern: &str, actions: &[Action]) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| EnvError::Config(format!("无效的确认规则 '{}': {}", pattern, e)))?;
        Ok(Self {
            pattern,
            actions: actions.to_vec(),
        })
    }

    fn matches(&self, name: &str, action: Action) -> bool {
        self.actions.contains(&action) && self.pattern.is_match(name)
    }
}

/// 确认策略表
#[derive(Debug, Clone, Default)]
pub struct ConfirmPolicy {
    rules: Vec<ConfirmRule>,
}

/// 默认需要确认的动作
pub const DEFAULT_ACTIONS: [Action; 2] = [Action::Set, Action::Delete];

impl ConfirmPolicy {
    pub fn new(rules: Vec<ConfirmRule>) -> Self {
        Self { rules }
    }

    /// 由名称模式列表创建，每条都作用于覆盖与删除
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| ConfirmRule::new(p.as_ref(), &DEFAULT_ACTIONS))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    /// 是否需要确认
    #[must_use]
    pub fn requires_confirmation(&self, name: &str, action: Action, sure: bool) -> bool {
        !sure && self.rules.iter().any(|r| r.matches(name, action))
    }
}

/// 确认提示文本
#[must_use]
pub fn prompt_text(name: &str, action: Action) -> String {
    let operation = match action {
        Action::Delete => "删除",
        _ => "覆盖",
    };
    format!("警告: 此操作将完全{} {}，确定吗? (y/N): ", operation, name)
}

/// 询问用户；仅 y / yes 视为同意，读到输入结尾视为拒绝
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    name: &str,
    action: Action,
) -> Result<bool> {
    write!(output, "{}", prompt_text(name, action))?;
    output.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    let response = response.trim().to_lowercase();

    Ok(response == "y" || response == "yes")
}

/// 确认后提权重启时追加的参数，避免新进程再次询问
pub const SURE_FLAG: &str = "--sure";

/// 按策略确认请求，返回提权重启时使用的参数
///
/// 需要确认且用户同意时追加 `--sure`；用户拒绝时返回 `Cancelled`。
pub fn confirm_request<R: BufRead, W: Write>(
    policy: &ConfirmPolicy,
    request: &Request,
    args: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>> {
    let mut relaunch_args = args.to_vec();
    if !policy.requires_confirmation(&request.name, request.action(), request.sure) {
        return Ok(relaunch_args);
    }

    if !confirm(input, output, &request.name, request.action())? {
        return Err(EnvError::Cancelled);
    }
    relaunch_args.push(SURE_FLAG.to_string());
    Ok(relaunch_args)
}
