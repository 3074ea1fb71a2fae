//! 文件描述符系统调用绑定层
//!
//! `binding` 模块是交给脚本宿主的 `_os` 原生模块；`driver` 是一个最小的命令行宿主，
//! 用于在没有脚本引擎的情况下调用这些操作。

pub mod binding;
pub mod config;
pub mod driver;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use script_value::HostError;
use tracing::info;

use crate::binding::MODULE_CONSTS;
use crate::config::DriverConfig;
use crate::driver::{Driver, STDOUT_FD};

/// 文件描述符原语调用工具
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 调用一个操作并打印结果，例如 `call open /tmp/x O_CREAT|O_WRONLY 0o644`
    Call {
        /// 操作名
        op: String,
        /// 参数字面量
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// 通过 open/read/write/close 把文件输出到标准输出
    Cat {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// 查看描述符 0、1、2 的终端信息
    Tty,
    /// 打印 open 标志位常量
    Consts,
}

fn report(err: &HostError) {
    eprintln!("{}: {}", err.name().red().bold(), err.message());
}

pub fn run_blocking(args: Args) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "加载配置文件");
            DriverConfig::new(path)?
        }
        None => DriverConfig::default(),
    };
    if !config.output.color {
        colored::control::set_override(false);
    }

    let driver = Driver::new(config);
    match args.command {
        Command::Call { op, args } => match driver.call(&op, &args) {
            Ok(value) => println!("{value}"),
            Err(err) => {
                report(&err);
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Cat { paths } => {
            for path in &paths {
                let copied = driver.cat(path, STDOUT_FD)?;
                info!(path = %path, copied, "输出完成");
            }
        }
        Command::Tty => {
            for (fd, name) in driver.tty_report() {
                match name {
                    Some(name) => println!("fd {fd}: {name}"),
                    None => println!("fd {fd}: not a tty"),
                }
            }
        }
        Command::Consts => {
            for entry in &MODULE_CONSTS {
                println!("{} = {}", entry.name, entry.value);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
