//! 系统调用绑定层
//!
//! 向脚本宿主暴露一组最小的文件描述符原语。每个操作只做一次系统调用，
//! 调用之间不保留任何状态，描述符的生命周期完全由调用方负责。

mod args;
mod consts;
mod error;
mod io;
mod process;
mod tty;

pub use args::{ReadTarget, WriteSource};
pub use consts::MODULE_CONSTS;
pub use error::{BindingError, OsError};
pub use io::{close, open, pipe, read, write};
pub use process::{CWD_CAPACITY, abort, getcwd};
pub use tty::{TTY_NAME_CAPACITY, isatty, ttyname};

use script_value::{ConstEntry, HostError, ModuleExports, NativeFunction, NativeModule};

/// 模块名
pub const MODULE_NAME: &str = "_os";

macro_rules! native {
    ($name:literal, $func:path, $nargs:expr) => {
        NativeFunction::new($name, |args| $func(args).map_err(HostError::from), $nargs)
    };
}

/// 函数表: 名称、入口、参数个数
pub static MODULE_FUNCS: [NativeFunction; 9] = [
    native!("open", io::open, 3),
    native!("read", io::read, 2),
    native!("write", io::write, 2),
    native!("close", io::close, 1),
    native!("abort", process::abort, 0),
    native!("pipe", io::pipe, 0),
    native!("isatty", tty::isatty, 1),
    native!("ttyname", tty::ttyname, 1),
    native!("getcwd", process::getcwd, 0),
];

/// `_os` 原生模块
#[derive(Debug, Default, Clone, Copy)]
pub struct OsModule;

impl NativeModule for OsModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn functions(&self) -> &[NativeFunction] {
        &MODULE_FUNCS
    }

    fn constants(&self) -> &[ConstEntry] {
        &MODULE_CONSTS
    }
}

/// 构造模块导出对象: 各操作函数加上 `c` 常量表
pub fn init_module() -> ModuleExports {
    ModuleExports::load(&OsModule)
}
