//! 提权处理
//!
//! 两段式协议：
//! - `is_elevated`：当前进程是否具备所需权限
//! - `relaunch_elevated`：以相同参数启动提权后的新进程，成功时当前进程随即退出；
//!   失败时返回 `PermissionDenied`

use crate::error::{EnvError, Result};
use std::convert::Infallible;
use std::process::Command;
use tracing::debug;

/// 需要时提权；已具备权限或不需要时直接返回
pub fn ensure_elevated(required: bool, args: &[String]) -> Result<()> {
    if !required {
        return Ok(());
    }
    if is_elevated() {
        debug!("已具备管理员权限");
        return Ok(());
    }
    match relaunch_elevated(args)? {}
}

/// 当前进程是否以管理员/root 身份运行
#[cfg(windows)]
pub fn is_elevated() -> bool {
    let script = "([Security.Principal.WindowsPrincipal][Security.Principal.WindowsIdentity]::GetCurrent()).IsInRole([Security.Principal.WindowsBuiltInRole]::Administrator)";
    Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", script])
        .output()
        .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "True")
        .unwrap_or(false)
}

/// 当前进程是否以管理员/root 身份运行
#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    Command::new("id")
        .arg("-u")
        .output()
        .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "0")
        .unwrap_or(false)
}

/// 以管理员身份重新启动自身，然后退出当前进程
#[cfg(windows)]
pub fn relaunch_elevated(args: &[String]) -> Result<Infallible> {
    use std::io::BufRead;

    println!("按回车键继续提权...");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);

    let exe = std::env::current_exe()
        .map_err(|e| EnvError::PermissionDenied(format!("无法确定程序路径: {}", e)))?;

    let script = start_process_script(&exe.display().to_string(), args);
    debug!("提权脚本: {}", script);

    let status = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .status()
        .map_err(|e| EnvError::PermissionDenied(format!("以管理员身份重新启动失败: {}", e)))?;

    if !status.success() {
        return Err(EnvError::PermissionDenied(
            "以管理员身份重新启动失败（可能已被拒绝）".to_string(),
        ));
    }
    std::process::exit(0)
}

/// 无法自动提权：提示使用 sudo
#[cfg(not(windows))]
pub fn relaunch_elevated(args: &[String]) -> Result<Infallible> {
    debug!("需要提权的参数: {:?}", args);
    Err(EnvError::PermissionDenied("请使用 sudo 重新运行".to_string()))
}

/// 生成 Start-Process -Verb RunAs 脚本
#[cfg_attr(not(windows), allow(dead_code))]
fn start_process_script(exe: &str, args: &[String]) -> String {
    let arg_line = args
        .iter()
        .map(|a| quote_windows_arg(a))
        .collect::<Vec<_>>()
        .join(" ");

    let mut script = format!("Start-Process -FilePath {}", quote_ps(exe));
    if !arg_line.is_empty() {
        script.push_str(&format!(" -ArgumentList {}", quote_ps(&arg_line)));
    }
    script.push_str(" -Verb RunAs -WindowStyle Hidden");
    script
}

/// PowerShell 单引号字符串
#[cfg_attr(not(windows), allow(dead_code))]
fn quote_ps(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// 按 Windows 命令行规则给单个参数加引号
#[cfg_attr(not(windows), allow(dead_code))]
fn quote_windows_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return arg.to_string();
    }

    let mut out = String::from("\"");
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                out.push_str(&"\\".repeat(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.push_str(&"\\".repeat(backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }
    out.push_str(&"\\".repeat(backslashes * 2));
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_windows_arg() {
        assert_eq!(quote_windows_arg("PATH"), "PATH");
        assert_eq!(quote_windows_arg("C:\\Tools"), "C:\\Tools");
        assert_eq!(
            quote_windows_arg("C:\\Program Files\\"),
            "\"C:\\Program Files\\\\\""
        );
        assert_eq!(quote_windows_arg("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote_windows_arg(""), "\"\"");
    }

    #[test]
    fn test_start_process_script() {
        let args = vec![
            "--system".to_string(),
            "--add".to_string(),
            "PATH".to_string(),
            "C:\\It's Here".to_string(),
        ];
        let script = start_process_script("C:\\bin\\setxx.exe", &args);
        assert!(script.starts_with("Start-Process -FilePath 'C:\\bin\\setxx.exe'"));
        assert!(script.contains("-ArgumentList '--system --add PATH \"C:\\It''s Here\"'"));
        assert!(script.ends_with("-Verb RunAs -WindowStyle Hidden"));
    }

    #[test]
    fn test_not_required_returns() {
        assert!(ensure_elevated(false, &[]).is_ok());
    }

    #[test]
    #[cfg(not(windows))]
    fn test_relaunch_reports_permission_denied() {
        let err = relaunch_elevated(&["--system".to_string()]).unwrap_err();
        assert!(matches!(err, EnvError::PermissionDenied(_)));
        assert!(err.to_string().contains("sudo"));
    }
}
