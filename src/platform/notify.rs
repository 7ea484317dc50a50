//! 环境变量变更广播
//!
//! Windows 上向所有顶层窗口发送 WM_SETTINGCHANGE ("Environment")，
//! 让资源管理器等进程重新加载环境。广播尽力而为，失败只记录日志。

use std::time::Duration;
#[cfg(windows)]
use tracing::warn;
use tracing::debug;

/// 变更通知接口
pub trait Notifier {
    /// 通知指定变量已变更（不返回结果）
    fn notify(&self, name: &str);
}

/// 系统广播通知器
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    timeout: Duration,
}

impl BroadcastNotifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[cfg(windows)]
impl BroadcastNotifier {
    /// SendMessageTimeout(HWND_BROADCAST, WM_SETTINGCHANGE, 0, "Environment", SMTO_ABORTIFHUNG, ...)
    fn script(&self) -> String {
        format!(
            "$sig = '[DllImport(\"user32.dll\", CharSet = CharSet.Unicode)] public static extern IntPtr SendMessageTimeout(IntPtr hWnd, uint Msg, UIntPtr wParam, string lParam, uint fuFlags, uint uTimeout, out UIntPtr lpdwResult);'; \
             $t = Add-Type -MemberDefinition $sig -Name NativeMethods -Namespace Setxx -PassThru; \
             $r = [UIntPtr]::Zero; \
             [void]$t::SendMessageTimeout([IntPtr]0xffff, 0x1A, [UIntPtr]::Zero, 'Environment', 2, {}, [ref]$r)",
            self.timeout.as_millis()
        )
    }

    fn broadcast(&self) -> std::io::Result<bool> {
        use std::process::{Command, Stdio};
        use std::time::Instant;

        let mut child = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", &self.script()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // PowerShell 启动本身需要时间，在广播超时之外再留余量
        let deadline = Instant::now() + self.timeout + Duration::from_secs(5);
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.success());
            }
            if Instant::now() >= deadline {
                child.kill()?;
                let _ = child.wait();
                return Ok(false);
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Notifier for BroadcastNotifier {
    #[cfg(windows)]
    fn notify(&self, name: &str) {
        match self.broadcast() {
            Ok(true) => debug!("已广播 {} 的变更", name),
            Ok(false) => warn!("广播 {} 的变更未完成", name),
            Err(e) => warn!("无法广播 {} 的变更: {}", name, e),
        }
    }

    #[cfg(not(windows))]
    fn notify(&self, name: &str) {
        debug!(
            "当前平台没有系统级变更广播，跳过 {} (超时 {:?})",
            name, self.timeout
        );
    }
}
