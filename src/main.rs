//! setxx 主程序入口
//!
//! 设计原则：
//! - 入口代码简洁，逻辑委托给各模块
//! - 退出码：成功或“条目不存在”的移除为 0，其余失败为 1
//! - 错误处理：详细/安静错误模式，通过 -debug 切换

use clap::{CommandFactory, Parser, error::ErrorKind};
use setxx::app::{Application, SUCCESS_HINT};
use setxx::cli::{self, Cli};
use setxx::config::{self, AppConfig};
use setxx::error::Result;
use setxx::platform::elevation;
use setxx::policy;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    let raw: Vec<String> = std::env::args().collect();
    let argv = cli::normalize_args(raw.clone());

    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(cli.debug);
    debug!(?raw, ?argv, "命令行参数");

    // 无参数：显示帮助
    if cli.args.is_empty() {
        let _ = Cli::command().print_help();
        println!();
        std::process::exit(1);
    }

    let verbose = cli.debug;
    if let Err(e) = run(cli, argv.get(1..).unwrap_or_default()) {
        e.report(verbose);
        std::process::exit(1);
    }
}

/// 初始化日志：默认只输出警告，RUST_LOG 可覆盖；-debug 时始终输出调试信息
fn init_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn log_filter(debug: bool) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    if debug {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

/// 运行一次调用
fn run(cli: Cli, args: &[String]) -> Result<()> {
    let request = cli.into_request()?;
    debug!(?request, "解析结果");

    let data_dir = config::data_dir()?;
    let app = Application::new(AppConfig::load(&data_dir)?, data_dir);

    // 破坏性操作确认；确认后的提权重启不再重复询问
    let relaunch_args = policy::confirm_request(
        &app.confirm_policy()?,
        &request,
        args,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout(),
    )?;

    // 需要时以管理员身份重新启动；重启成功时当前进程不会返回
    elevation::ensure_elevated(app.requires_elevation(request.scope), &relaunch_args)?;

    let outcome = app.execute(&request)?;
    if outcome.is_silent() {
        return Ok(());
    }

    if let Some(warning) = outcome.warning() {
        eprintln!("{}", warning);
    }
    println!("{}{}", outcome, SUCCESS_HINT);

    if request.demo {
        app.show_demo(&request);
    }

    Ok(())
}
