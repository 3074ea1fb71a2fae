use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use osbind::{Args, run_blocking};
use tracing::{Level, debug};
use tracing_subscriber::{self, EnvFilter, fmt::format::FmtSpan};

fn main() -> Result<ExitCode> {
    // 初始化日志，标准输出留给结果
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false) // 不显示目标模块
        .with_thread_ids(true) // 显示线程ID
        .with_thread_names(true) // 显示线程名称
        .with_file(true) // 显示文件名
        .with_line_number(true) // 显示行号
        .with_span_events(FmtSpan::ACTIVE) // 跟踪span的生命周期
        .init();

    // 解析命令行参数
    let args = Args::parse();

    debug!(version = env!("CARGO_PKG_VERSION"), command = ?args.command, "启动");

    run_blocking(args)
}
