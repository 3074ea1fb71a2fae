//! 参数转换
//!
//! 每个操作的参数都是固定位置、固定类型的。类型不符时在任何系统调用之前报错。

use std::ffi::CString;

use script_value::{Buffer, ScriptString, Value};

use super::error::{BindingError, OsError};

/// 取第 `index` 个参数为整数
///
/// 与宿主的整数转换一致：NaN 视为 0，其余向零截断并钳制到 32 位有符号范围。
/// 不做额外的取值范围检查，交由系统调用自己判断。
pub fn require_int(args: &[Value], index: usize) -> Result<i32, BindingError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(to_int32_clamped(*n)),
        other => Err(mismatch("number", other, index)),
    }
}

/// 取第 `index` 个参数为字符串
pub fn require_string(args: &[Value], index: usize) -> Result<&ScriptString, BindingError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        other => Err(mismatch("string", other, index)),
    }
}

/// 把路径转换为 C 字符串，内部含 NUL 时按 EINVAL 处理
pub fn to_c_path(path: &ScriptString, syscall: &'static str) -> Result<CString, OsError> {
    CString::new(path.as_bytes()).map_err(|_| OsError::from_code(libc::EINVAL, syscall))
}

/// 从定长缓冲区中取出第一个 NUL 之前的文本，没有 NUL 时取整个缓冲区
pub fn c_text(buf: &[u8]) -> Value {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Value::String(ScriptString::from(&buf[..end]))
}

fn to_int32_clamped(n: f64) -> i32 {
    if n.is_nan() {
        0
    } else {
        // `as` 对浮点转整数本身就是向零截断并饱和
        n as i32
    }
}

fn mismatch(expected: &str, found: Option<&Value>, index: usize) -> BindingError {
    let found = found.map_or("none", Value::type_name);
    BindingError::type_error(format!(
        "{expected} required, found {found} (argument {index})"
    ))
}

/// `read` 的第二个参数
#[derive(Debug)]
pub enum ReadTarget<'a> {
    /// 由本次调用分配临时缓冲区，返回读到的文本
    Scratch(i32),
    /// 读入调用方提供的缓冲区，返回读到的字节数
    External(&'a Buffer),
}

impl<'a> ReadTarget<'a> {
    pub fn from_args(args: &'a [Value], index: usize) -> Result<Self, BindingError> {
        match args.get(index) {
            Some(Value::Number(_)) => Ok(ReadTarget::Scratch(require_int(args, index)?)),
            Some(Value::Buffer(buf)) => {
                if buf.is_empty() {
                    return Err(BindingError::type_error("invalid buffer"));
                }
                Ok(ReadTarget::External(buf))
            }
            other => Err(mismatch("buffer", other, index)),
        }
    }
}

/// `write` 的数据参数，直接借用调用方的值
#[derive(Debug)]
pub enum WriteSource<'a> {
    Text(&'a ScriptString),
    Bytes(&'a Buffer),
}

impl<'a> WriteSource<'a> {
    pub fn from_args(args: &'a [Value], index: usize) -> Result<Self, BindingError> {
        match args.get(index) {
            Some(Value::String(s)) => Ok(WriteSource::Text(s)),
            Some(Value::Buffer(buf)) => Ok(WriteSource::Bytes(buf)),
            other => Err(mismatch("string or buffer", other, index)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            WriteSource::Text(s) => s.len(),
            WriteSource::Bytes(buf) => buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 以只读切片访问数据，不复制
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Result<R, BindingError> {
        match self {
            WriteSource::Text(s) => Ok(f(s.as_bytes())),
            WriteSource::Bytes(buf) => {
                let data = buf
                    .try_borrow()
                    .map_err(|_| BindingError::type_error("buffer is in use"))?;
                Ok(f(&data))
            }
        }
    }
}
