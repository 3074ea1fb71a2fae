//! 终端查询

use script_value::Value;

use super::args::{c_text, require_int};
use super::error::{BindingError, OsError};

/// ttyname 结果缓冲区大小，超出部分由系统返回 ERANGE
pub const TTY_NAME_CAPACITY: usize = 256;

/// 描述符是否指向终端
///
/// 无效描述符返回 false，从不报错。
pub fn isatty(args: &[Value]) -> Result<Value, BindingError> {
    let fd = require_int(args, 0)?;
    let r = unsafe { libc::isatty(fd) };
    Ok(Value::Bool(r == 1))
}

/// 终端设备名
pub fn ttyname(args: &[Value]) -> Result<Value, BindingError> {
    let fd = require_int(args, 0)?;
    let mut name = [0u8; TTY_NAME_CAPACITY];
    // ttyname_r 直接返回错误码，不经过 errno
    let r = unsafe { libc::ttyname_r(fd, name.as_mut_ptr().cast(), name.len()) };
    if r != 0 {
        return Err(OsError::from_code(r, "ttyname").into());
    }
    Ok(c_text(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::test_util::pipe_fds;

    #[test]
    fn test_isatty_false_for_pipe_and_invalid() {
        let (r, w) = pipe_fds();
        assert_eq!(isatty(&[Value::from(r)]).unwrap(), Value::Bool(false));
        assert_eq!(isatty(&[Value::from(w)]).unwrap(), Value::Bool(false));
        unsafe {
            libc::close(r);
            libc::close(w);
        }
        assert_eq!(isatty(&[Value::from(-1)]).unwrap(), Value::Bool(false));
        assert_eq!(isatty(&[Value::from(1_000_000)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_isatty_type_error() {
        assert!(matches!(isatty(&[Value::Undefined]), Err(BindingError::Type(_))));
    }

    #[test]
    fn test_ttyname_not_a_tty() {
        let (r, w) = pipe_fds();
        match ttyname(&[Value::from(r)]) {
            Err(BindingError::Os(err)) => {
                assert_eq!(err.code, libc::ENOTTY);
                assert_eq!(err.syscall, "ttyname");
            }
            other => panic!("Expected OS error, got {other:?}"),
        }
        unsafe {
            libc::close(r);
            libc::close(w);
        }
    }

    #[test]
    fn test_ttyname_on_pty() {
        let (mut master, mut slave) = (-1, -1);
        let r = unsafe {
            libc::openpty(
                &mut master,
                &mut slave,
                std::ptr::null_mut(),
                std::ptr::null(),
                std::ptr::null(),
            )
        };
        if r != 0 {
            // 没有挂载 devpts
            return;
        }
        assert_eq!(isatty(&[Value::from(slave)]).unwrap(), Value::Bool(true));
        let name = ttyname(&[Value::from(slave)]).unwrap();
        let name = name.as_string().unwrap().to_string_lossy();
        assert!(name.starts_with("/dev/pts/"), "unexpected tty name {name}");
        unsafe {
            libc::close(slave);
            libc::close(master);
        }
    }

    #[test]
    fn test_ttyname_bad_fd() {
        assert!(matches!(ttyname(&[Value::from(-1)]), Err(BindingError::Os(_))));
    }

    #[test]
    fn test_ttyname_fails_when_not_a_tty() {
        // 测试环境未必有终端，只检查非终端一定报错
        for fd in 0..3 {
            if isatty(&[Value::from(fd)]).unwrap() == Value::Bool(false) {
                assert!(matches!(ttyname(&[Value::from(fd)]), Err(BindingError::Os(_))));
            }
        }
    }
}
