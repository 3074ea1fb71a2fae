//! open 标志位常量
//!
//! 取值为当前平台的原生数值，不做跨平台重新编码。

use script_value::ConstEntry;

macro_rules! os_consts {
    ($($name:ident),* $(,)?) => {
        [$(ConstEntry::new(stringify!($name), libc::$name as f64)),*]
    };
}

pub static MODULE_CONSTS: [ConstEntry; 8] = os_consts![
    O_APPEND, O_CREAT, O_EXCL, O_RDONLY, O_RDWR, O_SYNC, O_TRUNC, O_WRONLY,
];
