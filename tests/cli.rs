use std::ffi::CString;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn osbind(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_osbind"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("无法启动 osbind")
}

fn temp_path(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("osbind-cli-{}-{}", std::process::id(), tag));
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn test_abort_kills_process() {
    let output = osbind(&["call", "abort"]);
    assert!(!output.status.success());
    assert_eq!(output.status.signal(), Some(libc::SIGABRT));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_getcwd_reports_working_directory() {
    let dir = std::fs::canonicalize(std::env::temp_dir()).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_osbind"))
        .args(["call", "getcwd"])
        .current_dir(&dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end_matches('\n'), dir.to_str().unwrap());
}

/// 在 `base` 下逐级创建目录，返回最深一级的描述符
///
/// 完整路径超过 PATH_MAX，只能借助 mkdirat/openat 相对创建。
fn nested_dir(base: &Path, depth: usize) -> i32 {
    let base = CString::new(base.to_str().unwrap()).unwrap();
    let name = CString::new("d".repeat(200)).unwrap();
    let mut fd = unsafe { libc::open(base.as_ptr(), libc::O_RDONLY | libc::O_DIRECTORY) };
    assert!(fd >= 0);
    for _ in 0..depth {
        assert_eq!(unsafe { libc::mkdirat(fd, name.as_ptr(), 0o700) }, 0);
        let next = unsafe { libc::openat(fd, name.as_ptr(), libc::O_RDONLY | libc::O_DIRECTORY) };
        assert!(next >= 0);
        unsafe { libc::close(fd) };
        fd = next;
    }
    fd
}

#[test]
fn test_getcwd_longer_than_buffer() {
    let base = temp_path("deep-cwd");
    let _ = std::fs::remove_dir_all(&base);
    std::fs::create_dir(&base).unwrap();
    // 45 级 201 字节的路径超过 8192 字节的结果缓冲区
    let deep = nested_dir(&base, 45);

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_osbind"));
    cmd.args(["call", "getcwd"]).env("NO_COLOR", "1");
    unsafe {
        cmd.pre_exec(move || {
            if libc::fchdir(deep) == 0 {
                Ok(())
            } else {
                Err(std::io::Error::last_os_error())
            }
        });
    }
    let output = cmd.output().unwrap();
    unsafe { libc::close(deep) };
    let _ = std::fs::remove_dir_all(&base);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let expected = std::io::Error::from_raw_os_error(libc::ERANGE).to_string();
    assert!(stderr.contains(&expected), "stderr: {stderr}");
}

#[test]
fn test_os_error_exit_status() {
    let output = osbind(&["call", "read", "-1", "4"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "stderr: {stderr}");
}

#[test]
fn test_type_error_exit_status() {
    let output = osbind(&["call", "read", "0", "buf:0"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TypeError: invalid buffer"), "stderr: {stderr}");
}

#[test]
fn test_open_creates_file() {
    let path = temp_path("open");
    let output = osbind(&[
        "call",
        "open",
        path.to_str().unwrap(),
        "O_CREAT|O_WRONLY|O_TRUNC",
        "0o644",
    ]);
    assert!(output.status.success());
    let fd: i32 = String::from_utf8(output.stdout).unwrap().trim().parse().unwrap();
    assert!(fd >= 0);
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_cat_copies_file() {
    let path = temp_path("cat");
    let content = b"line one\nline two\n\xff\x00end";
    std::fs::write(&path, content).unwrap();
    let output = osbind(&["cat", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(output.stdout, content);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_cat_with_buffer_mode_config() {
    let path = temp_path("cat-buffer");
    let config = temp_path("cat-buffer.toml");
    std::fs::write(&path, b"0123456789abcdef").unwrap();
    std::fs::write(&config, "[read]\nchunk_size = 3\nmode = \"buffer\"\n").unwrap();
    let output = osbind(&["--config", config.to_str().unwrap(), "cat", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"0123456789abcdef");
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&config);
}

#[test]
fn test_consts_listing() {
    let output = osbind(&["consts"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&format!("O_CREAT = {}", libc::O_CREAT)));
    assert_eq!(stdout.lines().count(), 8);
}

#[test]
fn test_pipe_returns_two_descriptors() {
    let output = osbind(&["call", "pipe"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let fds: Vec<i32> = stdout
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(", ")
        .map(|fd| fd.parse().unwrap())
        .collect();
    assert_eq!(fds.len(), 2);
    assert_ne!(fds[0], fds[1]);
}
