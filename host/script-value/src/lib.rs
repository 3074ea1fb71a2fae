//! 脚本宿主值模型
//!
//! 原生模块通过此 crate 与嵌入式脚本引擎交换参数、返回值和异常。
//! 所有值都是单线程的（基于 `Rc`/`RefCell`），与宿主引擎的执行模型一致。

mod error;
mod module;
mod value;

pub use error::HostError;
pub use module::{ConstEntry, ModuleExports, NativeFn, NativeFunction, NativeModule};
pub use value::{Buffer, Object, ScriptString, Value};
