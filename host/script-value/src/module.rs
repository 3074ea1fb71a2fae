//! 原生模块注册
//!
//! 原生模块以函数表 + 常量表的形式交给宿主，宿主据此构造导出对象。

use std::fmt;

use crate::error::HostError;
use crate::value::{Object, Value};

/// 原生函数入口
pub type NativeFn = fn(&[Value]) -> Result<Value, HostError>;

/// 函数表项: 名称、入口和固定参数个数
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
    pub nargs: usize,
}

impl NativeFunction {
    pub const fn new(name: &'static str, func: NativeFn, nargs: usize) -> Self {
        Self { name, func, nargs }
    }

    /// 以固定参数个数调用
    ///
    /// 原生函数总是恰好看到 `nargs` 个参数：缺少的补 `undefined`，多余的丢弃。
    pub fn call(&self, args: &[Value]) -> Result<Value, HostError> {
        let args: Vec<Value> = args
            .iter()
            .cloned()
            .chain(std::iter::repeat(Value::Undefined))
            .take(self.nargs)
            .collect();
        (self.func)(&args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("nargs", &self.nargs)
            .finish()
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.nargs == other.nargs
    }
}

/// 常量表项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstEntry {
    pub name: &'static str,
    pub value: f64,
}

impl ConstEntry {
    pub const fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

/// 原生模块 trait
/// 所有交给宿主加载的原生模块都必须实现此 trait
pub trait NativeModule {
    /// 模块名（宿主 `require` 时使用）
    fn name(&self) -> &str;

    /// 函数表
    fn functions(&self) -> &[NativeFunction];

    /// 常量表（可选）
    fn constants(&self) -> &[ConstEntry] {
        &[]
    }

    /// 常量表在导出对象上挂载的属性名
    fn constants_key(&self) -> &str {
        "c"
    }
}

/// 已加载模块的导出对象
#[derive(Debug, Clone)]
pub struct ModuleExports {
    name: String,
    exports: Object,
    constants_key: String,
}

impl ModuleExports {
    /// 由函数表和常量表构造导出对象
    pub fn load(module: &dyn NativeModule) -> Self {
        let mut exports = Object::new();
        for func in module.functions() {
            exports.set(func.name, Value::Function(*func));
        }

        let constants = module.constants();
        if !constants.is_empty() {
            let mut table = Object::new();
            for entry in constants {
                table.set(entry.name, entry.value);
            }
            exports.set(module.constants_key(), table);
        }

        Self {
            name: module.name().to_string(),
            exports,
            constants_key: module.constants_key().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object(&self) -> &Object {
        &self.exports
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.exports.get(key)
    }

    /// 查找常量表中的值
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.exports
            .get(&self.constants_key)
            .and_then(Value::as_object)
            .and_then(|table| table.get(name))
            .and_then(Value::as_number)
    }

    /// 按名称调用导出的函数
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        match self.exports.get(name) {
            Some(Value::Function(func)) => func.call(args),
            Some(other) => Err(HostError::Type(format!(
                "{name} is not a function ({})",
                other.type_name()
            ))),
            None => Err(HostError::Reference(format!("{name} is not defined"))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.exports)
    }
}
