//! 命令行宿主
//!
//! 加载 `_os` 模块，把命令行参数解析为脚本值后调用其中的操作。

use anyhow::{Context, Result, bail};
use script_value::{Buffer, HostError, ModuleExports, ScriptString, Value};
use tracing::{debug, debug_span};

use crate::binding::init_module;
use crate::config::{DriverConfig, ReadMode};

/// 标准输出描述符
pub const STDOUT_FD: i32 = 1;

/// 把命令行字面量解析为脚本值
///
/// 整数（十进制、`0x`、`0o`、`0b`）、`true`/`false`、`undefined`/`null`、
/// `buf:<n>` 缓冲区、`O_CREAT|O_WRONLY` 形式的常量组合，其余按文本处理。
pub fn parse_literal(exports: &ModuleExports, text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "undefined" => return Value::Undefined,
        "null" => return Value::Null,
        _ => {}
    }
    if let Some(len) = text.strip_prefix("buf:") {
        if let Ok(len) = len.parse::<usize>() {
            return Value::Buffer(Buffer::new(len));
        }
    }
    if let Some(n) = parse_int(text) {
        return Value::Number(n as f64);
    }
    if let Some(flags) = parse_flags(exports, text) {
        return Value::Number(flags);
    }
    Value::from(text)
}

fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (radix, digits) = if let Some(d) = digits.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = digits.strip_prefix("0o") {
        (8, d)
    } else if let Some(d) = digits.strip_prefix("0b") {
        (2, d)
    } else {
        (10, digits)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let n = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -n } else { n })
}

fn parse_flags(exports: &ModuleExports, text: &str) -> Option<f64> {
    let mut bits = 0i64;
    for name in text.split('|') {
        bits |= exports.constant(name.trim())? as i64;
    }
    Some(bits as f64)
}

/// 命令行宿主
pub struct Driver {
    exports: ModuleExports,
    config: DriverConfig,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            exports: init_module(),
            config,
        }
    }

    pub fn exports(&self) -> &ModuleExports {
        &self.exports
    }

    /// 调用一个操作
    pub fn call(&self, op: &str, args: &[String]) -> Result<Value, HostError> {
        let _span = debug_span!("call", op).entered();
        let values: Vec<Value> = args
            .iter()
            .map(|arg| parse_literal(&self.exports, arg))
            .collect();
        debug!(args = ?values, "dispatch");
        self.exports.call(op, &values)
    }

    /// 把文件内容复制到 `out_fd`，返回复制的字节数
    pub fn cat(&self, path: &str, out_fd: i32) -> Result<u64> {
        let flags = self
            .exports
            .constant("O_RDONLY")
            .context("常量表缺少 O_RDONLY")?;
        let fd = self
            .exports
            .call("open", &[Value::from(path), Value::Number(flags), Value::Number(0.0)])
            .with_context(|| format!("无法打开文件 '{}'", path))?;

        let copied = self.copy(&fd, out_fd);
        self.exports.call("close", &[fd])?;
        copied.with_context(|| format!("无法输出文件 '{}'", path))
    }

    fn copy(&self, fd: &Value, out_fd: i32) -> Result<u64> {
        let chunk_size = self.config.read.chunk_size;
        let buffer = match self.config.read.mode {
            ReadMode::Scratch => None,
            ReadMode::Buffer => Some(Buffer::new(chunk_size)),
        };

        let mut total = 0u64;
        loop {
            let chunk = match &buffer {
                None => {
                    let text = self
                        .exports
                        .call("read", &[fd.clone(), Value::Number(chunk_size as f64)])?;
                    match text {
                        Value::String(s) => s.into_bytes(),
                        other => bail!("read 返回了意外的值: {}", other.type_name()),
                    }
                }
                Some(buf) => {
                    let n = self
                        .exports
                        .call("read", &[fd.clone(), Value::Buffer(buf.clone())])?;
                    let n = n.as_number().context("read 应当返回字节数")? as usize;
                    buf.borrow()[..n].to_vec()
                }
            };
            if chunk.is_empty() {
                break;
            }
            self.write_all(out_fd, &chunk)?;
            total += chunk.len() as u64;
        }
        debug!(total, "copy finished");
        Ok(total)
    }

    /// write 只做一次系统调用，短写时在这里继续写剩余部分
    fn write_all(&self, fd: i32, data: &[u8]) -> Result<()> {
        let mut rest = data;
        while !rest.is_empty() {
            let n = self.exports.call(
                "write",
                &[Value::from(fd), Value::String(ScriptString::from(rest))],
            )?;
            let n = n.as_number().context("write 应当返回字节数")? as usize;
            if n == 0 {
                bail!("write 返回 0, 无法继续写入");
            }
            rest = &rest[n..];
        }
        Ok(())
    }

    /// 查询标准描述符的终端信息
    pub fn tty_report(&self) -> Vec<(i32, Option<String>)> {
        (0..3)
            .map(|fd| {
                let is_tty = self
                    .exports
                    .call("isatty", &[Value::from(fd)])
                    .is_ok_and(|r| r.as_bool() == Some(true));
                let name = is_tty.then(|| {
                    self.exports
                        .call("ttyname", &[Value::from(fd)])
                        .map(|name| name.to_string())
                        .unwrap_or_else(|err| format!("<{}>", err.message()))
                });
                (fd, name)
            })
            .collect()
    }
}
