use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
///
/// 按严重程度分为三类：
/// - 致命错误：`DirectoryRead` / `NoImages` / `ExportWrite` / `NoRecords` / `Config`
/// - 单文件错误：`Normalization` / `ImageRead` / `Extraction`，记录到断点文件后继续
/// - 警告：`CheckpointSave`，批处理继续
#[derive(Debug, Error)]
pub enum AppError {
    /// 无法读取图片目录
    #[error("无法读取目录 {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 目录中没有图片
    #[error("目录 {path} 中没有找到图片文件")]
    NoImages { path: PathBuf },

    /// 格式转换失败
    #[error("图片转换失败 ({path}): {message}")]
    Normalization { path: PathBuf, message: String },

    /// 读取图片内容失败
    #[error("读取图片失败 ({path}): {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 提取服务错误
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// 断点文件保存失败
    #[error("保存进度文件失败 ({path}): {message}")]
    CheckpointSave { path: PathBuf, message: String },

    /// CSV 写入失败
    #[error("写入 CSV 失败 ({path}): {message}")]
    ExportWrite { path: PathBuf, message: String },

    /// 没有任何成功的记录
    #[error("没有成功解析的阅读记录，无法导出")]
    NoRecords,

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 提取服务错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 未配置 API 密钥
    #[error("未设置 API 密钥 (LLM_API_KEY)")]
    MissingApiKey,

    /// 不支持的图片类型
    #[error("不支持的图片类型: {0}")]
    UnsupportedMediaType(String),

    /// 构建请求失败
    #[error("构建请求失败: {0}")]
    RequestBuild(String),

    /// API 调用失败
    #[error("LLM API 调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },

    /// 返回内容为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },

    /// 返回内容不是合法的记录 JSON
    #[error("解析返回的 JSON 失败: {source}\n原始内容: {raw}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件 {path} 失败: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("解析配置文件 {path} 失败: {source}")]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 未知的转换工具
    #[error("未知的 HEIC 转换工具: {0}（可选: sips / heif-convert / magick）")]
    UnknownConverter(String),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
