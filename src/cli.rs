//! CLI 参数定义

use crate::error::{EnvError, Result};
use crate::types::{Action, Position, Scope};
use clap::Parser;

const EXAMPLES: &str = "\
示例:
  setxx MYVAR \"Hello World\"        # 设置 MYVAR
  setxx -add PATH C:\\NewPath       # 把 C:\\NewPath 添加到 PATH
  setxx -add -top PATH C:\\First    # 添加到 PATH 开头
  setxx -add -before C:\\B PATH C:\\A  # 插入到 C:\\B 之前（已存在则移动）
  setxx -add -upper PATHEXT .py     # 以大写形式添加 (.PY)
  setxx -remove PATH C:\\OldPath    # 从 PATH 移除 C:\\OldPath
  setxx -remove TEMP_VAR           # 删除整个 TEMP_VAR
  setxx -sure PATH \"C:\\Only\\This\"  # 不经确认直接覆盖 PATH
  PS> setxx -add PATH $(pwd).Path  # PowerShell 中把当前目录加入 PATH
  CMD> setxx -add PATH %cd%        # 命令提示符中把当前目录加入 PATH";

/// setxx - 永久环境变量编辑工具
#[derive(Parser, Debug)]
#[command(
    name = "setxx",
    version,
    about = "永久环境变量编辑工具",
    long_about = "写入永久（按作用域保存的）环境变量，并广播变更通知，让正在运行的程序重新加载环境。\n\
                  以 ; 分隔的列表变量（如 PATH）可以按条目添加、移动、移除，条目比较不区分大小写。",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// <变量> <值>，或配合 -add/-remove 的 <变量> [条目]
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// 向列表变量（; 分隔）添加条目
    #[arg(long)]
    pub add: bool,

    /// 从列表变量移除条目；只给变量名时删除整个变量
    #[arg(long, conflicts_with = "add")]
    pub remove: bool,

    /// 修改系统变量（默认为用户变量）
    #[arg(long)]
    pub system: bool,

    /// 写入前转为大写（适用于 PATHEXT）
    #[arg(long)]
    pub upper: bool,

    /// 添加到列表开头（默认末尾）
    #[arg(long)]
    pub top: bool,

    /// 插入到指定条目之前（已存在则移动）
    #[arg(long, value_name = "ENTRY", conflicts_with = "top")]
    pub before: Option<String>,

    /// 跳过破坏性操作的确认提示
    #[arg(long)]
    pub sure: bool,

    /// 成功后展示更新后的变量
    #[arg(long)]
    pub demo: bool,

    /// 输出调试信息
    #[arg(long)]
    pub debug: bool,
}

/// 可以用单个 `-` 书写的长选项
const LONG_FLAGS: [&str; 11] = [
    "add", "remove", "system", "upper", "top", "before", "sure", "demo", "debug", "help",
    "version",
];

/// 把 `-add`、`-before=X` 这类单横线长选项规范为 `--add`、`--before=X`；
/// `--` 之后的参数原样保留
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let flag = rest.split_once('=').map_or(rest, |(f, _)| f);
                    if LONG_FLAGS.contains(&flag) {
                        format!("-{}", arg)
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

/// 解析后的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub scope: Scope,
    pub name: String,
    pub command: Command,
    pub upper: bool,
    pub sure: bool,
    pub demo: bool,
}

/// 要执行的动作及其参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { value: String },
    Add { entry: String, position: Position },
    Remove { entry: String },
    Delete,
}

impl Request {
    pub fn action(&self) -> Action {
        match self.command {
            Command::Set { .. } => Action::Set,
            Command::Add { .. } => Action::Add,
            Command::Remove { .. } => Action::Remove,
            Command::Delete => Action::Delete,
        }
    }
}

impl Cli {
    /// 校验参数组合并生成请求（不访问存储）
    pub fn into_request(self) -> Result<Request> {
        let usage = |msg: &str| Err(EnvError::Usage(msg.to_string()));

        let mut args = self.args.into_iter();
        let (name, second, extra) = (args.next(), args.next(), args.next());
        let count = [&name, &second, &extra].iter().filter(|a| a.is_some()).count();

        let command = if self.add {
            match (second, extra) {
                (Some(entry), None) if name.is_some() => Command::Add {
                    entry,
                    position: if let Some(anchor) = self.before.clone() {
                        Position::Before(anchor)
                    } else if self.top {
                        Position::Prepend
                    } else {
                        Position::Append
                    },
                },
                _ => return usage("-add 需要 2 个参数: <变量> <条目>"),
            }
        } else if self.remove {
            if self.upper || self.top || self.before.is_some() {
                return usage("-upper、-top 和 -before 不能与 -remove 一起使用");
            }
            match (second, extra) {
                (None, None) if name.is_some() => Command::Delete,
                (Some(entry), None) => Command::Remove { entry },
                _ => return usage("-remove 需要 1 或 2 个参数: <变量> [条目]"),
            }
        } else {
            if self.top || self.before.is_some() {
                return usage("-top 和 -before 只能与 -add 一起使用");
            }
            match (second, extra) {
                (Some(value), None) => Command::Set { value },
                _ => {
                    return Err(EnvError::Usage(format!(
                        "设置需要 2 个参数: <变量> <值>，实际为 {} 个",
                        count
                    )));
                }
            }
        };

        let name = name.unwrap_or_default();
        if name.is_empty() {
            return usage("变量名不能为空");
        }
        if let Some(Position::Before(anchor)) = match &command {
            Command::Add { position, .. } => Some(position),
            _ => None,
        } {
            if anchor.is_empty() {
                return usage("-before 的条目不能为空");
            }
        }
        match &command {
            Command::Add { entry, .. } | Command::Remove { entry } if entry.is_empty() => {
                return usage("条目不能为空");
            }
            _ => {}
        }

        Ok(Request {
            scope: if self.system { Scope::System } else { Scope::User },
            name,
            command,
            upper: self.upper,
            sure: self.sure,
            demo: self.demo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Request> {
        let argv = normalize_args(std::iter::once("setxx").chain(args.iter().copied()));
        Cli::try_parse_from(argv)
            .map_err(|e| EnvError::Usage(e.to_string()))?
            .into_request()
    }

    fn usage_err(args: &[&str]) -> String {
        match parse(args) {
            Err(EnvError::Usage(msg)) => msg,
            other => panic!("期望用法错误，实际 {:?}", other),
        }
    }

    // ==================== 参数规范化 ====================

    #[test]
    fn test_normalize_single_dash_long_flags() {
        let argv = normalize_args(["setxx", "-add", "-before=C:\\B", "PATH", "-x", "--top", "-h"]);
        assert_eq!(
            argv,
            vec!["setxx", "--add", "--before=C:\\B", "PATH", "-x", "--top", "-h"]
        );
    }

    #[test]
    fn test_normalize_stops_after_double_dash() {
        let argv = normalize_args(["-add", "MYVAR", "--", "-top"]);
        assert_eq!(argv, vec!["-add", "MYVAR", "--", "-top"]);
    }

    // ==================== 动作解析 ====================

    #[test]
    fn test_set() {
        let req = parse(&["MYVAR", "Hello World"]).unwrap();
        assert_eq!(req.scope, Scope::User);
        assert_eq!(req.name, "MYVAR");
        assert_eq!(
            req.command,
            Command::Set {
                value: "Hello World".to_string()
            }
        );
        assert_eq!(req.action(), Action::Set);
    }

    #[test]
    fn test_flags_after_positionals() {
        let req = parse(&["PATH", "-add", "C:\\Tools", "-system", "-top"]).unwrap();
        assert_eq!(req.scope, Scope::System);
        assert_eq!(
            req.command,
            Command::Add {
                entry: "C:\\Tools".to_string(),
                position: Position::Prepend
            }
        );
    }

    #[test]
    fn test_add_before() {
        let req = parse(&["-add", "-before", "C:\\B", "PATH", "C:\\A", "-upper"]).unwrap();
        assert!(req.upper);
        assert_eq!(
            req.command,
            Command::Add {
                entry: "C:\\A".to_string(),
                position: Position::Before("C:\\B".to_string())
            }
        );
    }

    #[test]
    fn test_remove_entry_and_delete() {
        let req = parse(&["-remove", "PATH", "C:\\Old"]).unwrap();
        assert_eq!(
            req.command,
            Command::Remove {
                entry: "C:\\Old".to_string()
            }
        );

        let req = parse(&["-remove", "TEMP_VAR", "-sure"]).unwrap();
        assert_eq!(req.command, Command::Delete);
        assert_eq!(req.action(), Action::Delete);
        assert!(req.sure);
    }

    // ==================== 用法错误 ====================

    #[test]
    fn test_argument_counts() {
        assert!(usage_err(&["-add", "PATH"]).contains("-add"));
        assert!(usage_err(&["-add", "PATH", "a", "b"]).contains("-add"));
        assert!(usage_err(&["-remove", "PATH", "a", "b"]).contains("-remove"));
        assert!(usage_err(&["ONLYNAME"]).contains("实际为 1 个"));
        assert!(usage_err(&["A", "B", "C"]).contains("实际为 3 个"));
        assert!(usage_err(&["-remove"]).contains("-remove"));
    }

    #[test]
    fn test_positioning_only_with_add() {
        assert!(usage_err(&["-top", "PATH", "x"]).contains("-add"));
        assert!(usage_err(&["-before", "a", "PATH", "x"]).contains("-add"));
        assert!(usage_err(&["-remove", "-top", "PATH", "x"]).contains("-remove"));
        assert!(usage_err(&["-remove", "-upper", "PATH"]).contains("-upper"));
    }

    #[test]
    fn test_conflicting_flags() {
        usage_err(&["-add", "-remove", "PATH", "x"]);
        usage_err(&["-add", "-top", "-before", "a", "PATH", "x"]);
    }

    #[test]
    fn test_empty_values() {
        assert!(usage_err(&["-add", "PATH", ""]).contains("条目"));
        assert!(usage_err(&["-remove", "PATH", ""]).contains("条目"));
        assert!(usage_err(&["", "value"]).contains("变量名"));
        assert!(usage_err(&["-add", "-before", "", "PATH", "x"]).contains("-before"));
    }

    #[test]
    fn test_set_allows_empty_value() {
        let req = parse(&["MYVAR", ""]).unwrap();
        assert_eq!(
            req.command,
            Command::Set {
                value: String::new()
            }
        );
    }
}
