//! 抛给脚本的异常

use thiserror::Error;

use crate::value::{Object, Value};

/// 宿主异常类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// 参数类型不符或参数不合法
    #[error("TypeError: {0}")]
    Type(String),
    /// 携带 errno 的系统错误
    #[error("Error: {message}")]
    Errno {
        errno: i32,
        syscall: String,
        message: String,
    },
    /// 访问了不存在的导出项
    #[error("ReferenceError: {0}")]
    Reference(String),
}

impl HostError {
    pub fn type_error(message: impl Into<String>) -> Self {
        HostError::Type(message.into())
    }

    /// 脚本侧看到的错误名
    pub fn name(&self) -> &'static str {
        match self {
            HostError::Type(_) => "TypeError",
            HostError::Errno { .. } => "Error",
            HostError::Reference(_) => "ReferenceError",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            HostError::Type(msg) | HostError::Reference(msg) => msg,
            HostError::Errno { message, .. } => message,
        }
    }

    pub fn errno(&self) -> Option<i32> {
        match self {
            HostError::Errno { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// 转换为脚本可见的错误对象
    pub fn to_value(&self) -> Value {
        let mut obj = Object::new();
        obj.set("name", self.name());
        obj.set("message", self.message());
        if let HostError::Errno { errno, syscall, .. } = self {
            obj.set("errno", *errno);
            obj.set("syscall", syscall.as_str());
        }
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_error_object() {
        let err = HostError::Errno {
            errno: 2,
            syscall: "open".to_string(),
            message: "No such file or directory".to_string(),
        };
        let value = err.to_value();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("name"), Some(&Value::from("Error")));
        assert_eq!(obj.get("errno"), Some(&Value::Number(2.0)));
        assert_eq!(obj.get("syscall"), Some(&Value::from("open")));
        assert_eq!(err.errno(), Some(2));
    }

    #[test]
    fn test_type_error_has_no_errno() {
        let err = HostError::type_error("invalid buffer");
        assert_eq!(err.to_string(), "TypeError: invalid buffer");
        assert_eq!(err.errno(), None);
        let value = err.to_value();
        assert!(value.as_object().unwrap().get("errno").is_none());
    }
}
