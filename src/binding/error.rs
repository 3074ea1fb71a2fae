//! 错误转换
//!
//! 系统调用失败时立即读取 errno 并作为数据携带，之后再做日志或清理。

use std::fmt;
use std::io;

use script_value::HostError;
use thiserror::Error;

/// 系统调用失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsError {
    /// errno
    pub code: i32,
    /// 失败的系统调用
    pub syscall: &'static str,
}

impl OsError {
    /// 读取当前线程的 errno
    ///
    /// 必须紧跟在失败的系统调用之后调用，中间不能有任何可能改写 errno 的操作。
    pub fn last(syscall: &'static str) -> Self {
        let code = io::Error::last_os_error()
            .raw_os_error()
            .unwrap_or(libc::EIO);
        Self { code, syscall }
    }

    pub fn from_code(code: i32, syscall: &'static str) -> Self {
        Self { code, syscall }
    }

    /// 平台对该 errno 的描述
    pub fn message(&self) -> String {
        io::Error::from_raw_os_error(self.code).to_string()
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.syscall, self.message())
    }
}

impl std::error::Error for OsError {}

/// 绑定层错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// 参数类型错误，总是在系统调用之前报告
    #[error("类型错误: {0}")]
    Type(String),
    #[error("系统错误: {0}")]
    Os(#[from] OsError),
}

impl BindingError {
    pub fn type_error(message: impl Into<String>) -> Self {
        BindingError::Type(message.into())
    }

    pub fn errno(&self) -> Option<i32> {
        match self {
            BindingError::Os(err) => Some(err.code),
            BindingError::Type(_) => None,
        }
    }
}

impl From<BindingError> for HostError {
    fn from(err: BindingError) -> Self {
        match err {
            BindingError::Type(message) => HostError::Type(message),
            BindingError::Os(os) => HostError::Errno {
                errno: os.code,
                syscall: os.syscall.to_string(),
                message: os.message(),
            },
        }
    }
}

/// 以负数表示失败的系统调用返回值
pub(crate) trait SyscallRet: Copy {
    fn is_failure(self) -> bool;
}

impl SyscallRet for libc::c_int {
    fn is_failure(self) -> bool {
        self < 0
    }
}

impl SyscallRet for libc::ssize_t {
    fn is_failure(self) -> bool {
        self < 0
    }
}

/// 检查系统调用返回值，失败时立刻捕获 errno
pub(crate) fn cvt<T: SyscallRet>(ret: T, syscall: &'static str) -> Result<T, OsError> {
    if ret.is_failure() {
        Err(OsError::last(syscall))
    } else {
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cvt_passes_non_negative() {
        assert_eq!(cvt(0 as libc::c_int, "close"), Ok(0));
        assert_eq!(cvt(17 as libc::ssize_t, "read"), Ok(17));
    }

    #[test]
    fn test_cvt_captures_errno() {
        let r = unsafe { libc::close(-1) };
        let err = cvt(r, "close").unwrap_err();
        assert_eq!(err.code, libc::EBADF);
        assert_eq!(err.syscall, "close");
    }

    #[test]
    fn test_host_error_conversion() {
        let host: HostError = BindingError::from(OsError::from_code(libc::ENOENT, "open")).into();
        match host {
            HostError::Errno { errno, syscall, message } => {
                assert_eq!(errno, libc::ENOENT);
                assert_eq!(syscall, "open");
                assert!(!message.is_empty());
            }
            other => panic!("Expected errno error, got {other:?}"),
        }

        let host: HostError = BindingError::type_error("invalid buffer").into();
        assert_eq!(host, HostError::Type("invalid buffer".to_string()));
    }
}
