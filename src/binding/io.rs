//! 文件描述符读写

use script_value::{ScriptString, Value};
use tracing::{debug, trace};

use super::args::{ReadTarget, WriteSource, require_int, require_string, to_c_path};
use super::error::{BindingError, OsError, cvt};

/// 打开文件
///
/// 参数: path, flags, mode。flags 与 mode 原样传给系统调用。
pub fn open(args: &[Value]) -> Result<Value, BindingError> {
    let path = require_string(args, 0)?;
    let flags = require_int(args, 1)?;
    let mode = require_int(args, 2)?;
    let c_path = to_c_path(path, "open")?;

    let fd = cvt(
        unsafe { libc::open(c_path.as_ptr(), flags, mode as libc::c_uint) },
        "open",
    )?;
    debug!(path = %path, flags, mode, fd, "open");
    Ok(Value::from(fd))
}

/// 从描述符读取
///
/// 参数: fd, 字节数或缓冲区。
/// 传字节数时返回读到的文本，传缓冲区时数据写入缓冲区并返回字节数。
pub fn read(args: &[Value]) -> Result<Value, BindingError> {
    let fd = require_int(args, 0)?;
    match ReadTarget::from_args(args, 1)? {
        ReadTarget::Scratch(size) => read_scratch(fd, size),
        ReadTarget::External(buf) => {
            let mut data = buf
                .try_borrow_mut()
                .map_err(|_| BindingError::type_error("buffer is in use"))?;
            let n = cvt(
                unsafe { libc::read(fd, data.as_mut_ptr().cast(), data.len()) },
                "read",
            )?;
            trace!(fd, capacity = data.len(), n, "read into buffer");
            Ok(Value::Number(n as f64))
        }
    }
}

/// 临时缓冲区由本函数独占，任何返回路径上都随 drop 释放
fn read_scratch(fd: i32, size: i32) -> Result<Value, BindingError> {
    let size = usize::try_from(size).map_err(|_| OsError::from_code(libc::ENOMEM, "read"))?;
    let mut scratch: Vec<u8> = Vec::new();
    scratch
        .try_reserve_exact(size)
        .map_err(|_| OsError::from_code(libc::ENOMEM, "read"))?;

    // 只预留不填充，未读到的部分不占用物理内存
    let n = cvt(
        unsafe { libc::read(fd, scratch.spare_capacity_mut().as_mut_ptr().cast(), size) },
        "read",
    )?;
    // read 保证前 n 个字节已写入
    unsafe { scratch.set_len(n as usize) };
    scratch.shrink_to_fit();
    trace!(fd, size, n, "read");
    Ok(Value::String(ScriptString::from_bytes(scratch)))
}

/// 向描述符写入
///
/// 参数: fd, 文本或缓冲区。只调用一次 write，短写直接把字节数返回给调用方。
pub fn write(args: &[Value]) -> Result<Value, BindingError> {
    let fd = require_int(args, 0)?;
    let source = WriteSource::from_args(args, 1)?;

    let ret = source.with_bytes(|data| unsafe { libc::write(fd, data.as_ptr().cast(), data.len()) })?;
    let n = cvt(ret, "write")?;
    trace!(fd, len = source.len(), n, "write");
    Ok(Value::Number(n as f64))
}

/// 关闭描述符
///
/// 不检查 close 的结果，总是返回 undefined。
pub fn close(args: &[Value]) -> Result<Value, BindingError> {
    let fd = require_int(args, 0)?;
    let r = unsafe { libc::close(fd) };
    if r < 0 {
        debug!(fd, "close 失败, 忽略");
    }
    Ok(Value::Undefined)
}

/// 创建管道，返回 [读端, 写端]
pub fn pipe(_args: &[Value]) -> Result<Value, BindingError> {
    let mut fds: [libc::c_int; 2] = [-1; 2];
    cvt(unsafe { libc::pipe(fds.as_mut_ptr()) }, "pipe")?;
    debug!(read_fd = fds[0], write_fd = fds[1], "pipe");
    Ok(Value::Array(vec![Value::from(fds[0]), Value::from(fds[1])]))
}
