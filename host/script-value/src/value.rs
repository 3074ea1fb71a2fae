//! 脚本值定义

use std::borrow::Cow;
use std::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::module::NativeFunction;

/// 宿主字符串
///
/// 宿主的字符串是字节序列，不保证是合法的 UTF-8。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScriptString(Vec<u8>);

impl ScriptString {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按 UTF-8 解码，非法序列替换为 U+FFFD
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for ScriptString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for ScriptString {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for ScriptString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ScriptString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl PartialEq<str> for ScriptString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for ScriptString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for ScriptString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// 外部字节缓冲区
///
/// 容量在创建时固定。克隆得到的是同一块存储的另一个引用，
/// 原生函数写入后调用方可以直接看到数据。
#[derive(Clone)]
pub struct Buffer {
    data: Rc<RefCell<Box<[u8]>>>,
    len: usize,
}

impl Buffer {
    /// 创建长度为 `len` 的全零缓冲区
    pub fn new(len: usize) -> Self {
        Self::from_bytes(vec![0; len])
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let data = bytes.into().into_boxed_slice();
        let len = data.len();
        Self {
            data: Rc::new(RefCell::new(data)),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn borrow(&self) -> Ref<'_, [u8]> {
        Ref::map(self.data.borrow(), |data| &**data)
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, [u8]>, BorrowError> {
        self.data
            .try_borrow()
            .map(|data| Ref::map(data, |data| &**data))
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, [u8]>, BorrowMutError> {
        self.data
            .try_borrow_mut()
            .map(|data| RefMut::map(data, |data| &mut **data))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.borrow().to_vec()
    }

    /// 两个句柄是否指向同一块存储
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer").field("len", &self.len).finish()
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.try_borrow(), other.try_borrow()) {
            (Ok(a), Ok(b)) => *a == *b,
            _ => false,
        }
    }
}

/// 脚本对象（属性表）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object(FxHashMap<String, Value>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按键名排序的属性列表
    pub fn sorted(&self) -> Vec<(&str, &Value)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// 脚本值
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(ScriptString),
    Buffer(Buffer),
    Array(Vec<Value>),
    Object(Object),
    Function(NativeFunction),
}

impl Value {
    /// 类型名，用于错误信息
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Buffer(_) => "buffer",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&ScriptString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_buffer(&self) -> Option<&Buffer> {
        match self {
            Value::Buffer(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    // 嵌套在数组/对象里的字符串带引号输出
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s.to_string_lossy()),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Buffer(b) => match b.try_borrow() {
                Ok(data) => write!(f, "<Buffer {}>", hex::encode(&*data)),
                Err(_) => write!(f, "<Buffer len={}>", b.len()),
            },
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => {
                if obj.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (key, value)) in obj.sorted().into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: ")?;
                    value.fmt_nested(f)?;
                }
                f.write_str(" }")
            }
            Value::Function(func) => write!(f, "[function {}]", func.name),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<ScriptString> for Value {
    fn from(s: ScriptString) -> Self {
        Value::String(s)
    }
}

impl From<Buffer> for Value {
    fn from(b: Buffer) -> Self {
        Value::Buffer(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}
