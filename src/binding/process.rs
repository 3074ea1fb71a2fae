//! 进程相关操作

use script_value::Value;
use tracing::error;

use super::args::c_text;
use super::error::{BindingError, OsError};

/// getcwd 结果缓冲区大小，超出部分由系统返回 ERANGE
pub const CWD_CAPACITY: usize = 8192;

/// 当前工作目录
pub fn getcwd(_args: &[Value]) -> Result<Value, BindingError> {
    let mut path = [0u8; CWD_CAPACITY];
    let r = unsafe { libc::getcwd(path.as_mut_ptr().cast(), path.len()) };
    if r.is_null() {
        return Err(OsError::last("getcwd").into());
    }
    Ok(c_text(&path))
}

/// 立即终止进程，不返回
pub fn abort(_args: &[Value]) -> Result<Value, BindingError> {
    error!("abort");
    std::process::abort()
}
