use crate::error::ConfigError;
use crate::infrastructure::ConverterTool;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 可选的配置文件（位于工作目录）
pub const CONFIG_FILE_NAME: &str = "reading-logs.toml";

/// 程序配置
///
/// 加载顺序：默认值 → 工作目录下的 `reading-logs.toml`（可选）→ 环境变量
#[derive(Clone, Debug)]
pub struct Config {
    /// 扫描图片的目录
    pub image_dir: PathBuf,
    /// 断点文件
    pub checkpoint_file: PathBuf,
    /// 输出的 CSV 文件
    pub output_csv: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_max_tokens: u32,
    // --- HEIC 转换 ---
    pub converter_tool: ConverterTool,
    /// 覆盖转换工具的可执行文件路径
    pub converter_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("."),
            checkpoint_file: PathBuf::from(".progress.json"),
            output_csv: PathBuf::from("reading_logs.csv"),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            llm_max_tokens: 1024,
            converter_tool: ConverterTool::platform_default(),
            converter_path: None,
        }
    }
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    image_dir: Option<PathBuf>,
    checkpoint_file: Option<PathBuf>,
    output_csv: Option<PathBuf>,
    verbose_logging: Option<bool>,
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    llm_max_tokens: Option<u32>,
    converter_tool: Option<String>,
    converter_path: Option<String>,
}

impl Config {
    /// 按默认值 → 配置文件 → 环境变量的顺序加载
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
            config = config.merge_toml(&content, path)?;
        }
        config.apply_env(|name| std::env::var(name).ok())
    }

    /// 只使用环境变量覆盖默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|name| std::env::var(name).ok())
    }

    fn merge_toml(mut self, content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(v) = file.image_dir {
            self.image_dir = v;
        }
        if let Some(v) = file.checkpoint_file {
            self.checkpoint_file = v;
        }
        if let Some(v) = file.output_csv {
            self.output_csv = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.llm_api_key {
            self.llm_api_key = v;
        }
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if let Some(v) = file.llm_max_tokens {
            self.llm_max_tokens = v;
        }
        if let Some(v) = file.converter_tool {
            self.converter_tool = v.parse()?;
        }
        if file.converter_path.is_some() {
            self.converter_path = file.converter_path;
        }
        Ok(self)
    }

    /// `lookup` 用于读取环境变量，测试时可替换
    fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("IMAGE_DIR") {
            self.image_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CHECKPOINT_FILE") {
            self.checkpoint_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("OUTPUT_CSV") {
            self.output_csv = PathBuf::from(v);
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &v, "bool")?;
        }
        if let Some(v) = lookup("LLM_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.llm_api_key = v;
        }
        if let Some(v) = lookup("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Some(v) = lookup("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Some(v) = lookup("LLM_MAX_TOKENS") {
            self.llm_max_tokens = parse_env("LLM_MAX_TOKENS", &v, "u32")?;
        }
        if let Some(v) = lookup("HEIC_CONVERTER") {
            self.converter_tool = v.parse()?;
        }
        if let Some(v) = lookup("HEIC_CONVERTER_PATH") {
            self.converter_path = Some(v);
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}
