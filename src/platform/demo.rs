//! -demo：展示更新后的变量

use crate::types::Scope;
use std::time::Duration;

/// Windows: 等待变更传播后，打开一个全新的 cmd 窗口显示变量
#[cfg(windows)]
pub fn show(scope: Scope, name: &str, stored: Option<&str>, delay: Duration) {
    use std::process::Command;
    use tracing::warn;

    if !cmd_safe(name) {
        warn!("变量名 {} 含有命令行特殊字符，改为直接输出", name);
        println!("{}", render(scope, name, stored));
        return;
    }

    std::thread::sleep(delay);

    // start 启动的新窗口从注册表读取环境，能看到刚写入的值
    let cmd_line = format!(
        "@echo off & echo, & echo {}:{}=%{}% & echo, & pause",
        scope, name, name
    );
    if let Err(e) = Command::new("cmd.exe")
        .args(["/c", "start", "cmd.exe", "/c", &cmd_line])
        .status()
    {
        warn!("无法打开演示窗口: {}", e);
    }
}

/// 其他平台：直接打印存储中的当前值
#[cfg(not(windows))]
pub fn show(scope: Scope, name: &str, stored: Option<&str>, _delay: Duration) {
    println!("{}", render(scope, name, stored));
}

/// cmd 会解释的特殊字符
#[cfg_attr(not(windows), allow(dead_code))]
const CMD_SPECIAL: [char; 10] = ['&', '|', '<', '>', '^', '%', '"', '(', ')', '!'];

/// 变量名能否原样放进 `cmd /c` 命令行
#[cfg_attr(not(windows), allow(dead_code))]
fn cmd_safe(name: &str) -> bool {
    !name.is_empty() && !name.contains(CMD_SPECIAL) && !name.chars().any(char::is_control)
}

fn render(scope: Scope, name: &str, stored: Option<&str>) -> String {
    match stored {
        Some(value) => format!("{}:{}={}", scope, name, value),
        None => format!("{}:{} (未定义)", scope, name),
    }
}
