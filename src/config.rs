use anyhow::{self, Context, bail};
use serde::Deserialize;
use std::path::Path;

/// `cat` 使用的读取方式
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// 每次由 read 分配临时缓冲区并返回文本
    #[default]
    Scratch,
    /// 复用同一个外部缓冲区，read 返回字节数
    Buffer,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ReadConfig {
    pub chunk_size: usize,
    pub mode: ReadMode,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            mode: ReadMode::Scratch,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// 命令行宿主配置，所有项都可省略
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DriverConfig {
    pub read: ReadConfig,
    pub output: OutputConfig,
}

impl DriverConfig {
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<DriverConfig> {
        let toml_str = std::fs::read_to_string(&path)
            .with_context(|| format!("无法读取配置文件: {:?}", &path.as_ref().as_os_str()))?;
        let config = DriverConfig::from_toml(&toml_str)
            .with_context(|| format!("无法解析配置文件: {:?}", &path.as_ref().as_os_str()))?;
        anyhow::Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> anyhow::Result<DriverConfig> {
        let config: DriverConfig = toml::from_str(toml_str)?;
        config.validate()?;
        anyhow::Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.read.chunk_size == 0 {
            bail!("read.chunk_size 必须大于 0");
        }
        // read 的长度参数是 32 位整数
        if self.read.chunk_size > i32::MAX as usize {
            bail!("read.chunk_size 过大: {}", self.read.chunk_size);
        }
        Ok(())
    }
}
