//! 提取服务 - 业务能力层
//!
//! 只负责"从一张图片中读出阅读记录"，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型（兼容 OpenAI API 的服务均可）
//! - 通过 `response_format = json_schema` 约束结构化输出

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrl, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::ExtractionError;
use crate::models::schema::{reading_log_schema, SCHEMA_NAME};
use crate::models::{ReadingLog, FORM_DAYS};
use crate::utils::logging::truncate_text;

/// 从图片中提取阅读记录的能力
///
/// 批处理只依赖这个 trait，测试时可以换成桩实现。
#[async_trait]
pub trait Extractor: Send + Sync {
    /// `base64_data` 为图片原始字节的 base64 编码
    async fn extract(
        &self,
        media_type: &str,
        base64_data: &str,
    ) -> Result<ReadingLog, ExtractionError>;
}

/// 基于 LLM 视觉模型的提取服务
pub struct ExtractionService {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_tokens: u32,
    has_api_key: bool,
}

impl ExtractionService {
    /// 创建新的提取服务
    ///
    /// 没有 API 密钥时不会报错，每次调用 `extract` 时才返回 `MissingApiKey`。
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            max_tokens: config.llm_max_tokens,
            has_api_key: !config.llm_api_key.trim().is_empty(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_request_messages(
        &self,
        media_type: &str,
        base64_data: &str,
    ) -> Result<Vec<ChatCompletionRequestMessage>, ExtractionError> {
        let content_parts = vec![
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: format!("data:{};base64,{}", media_type, base64_data),
                        // 手写内容需要高分辨率
                        detail: Some(ImageDetail::High),
                    },
                },
            ),
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: build_prompt(),
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()
            .map_err(|e| ExtractionError::RequestBuild(e.to_string()))?;

        Ok(vec![ChatCompletionRequestMessage::User(user_msg)])
    }
}

#[async_trait]
impl Extractor for ExtractionService {
    async fn extract(
        &self,
        media_type: &str,
        base64_data: &str,
    ) -> Result<ReadingLog, ExtractionError> {
        if !self.has_api_key {
            return Err(ExtractionError::MissingApiKey);
        }
        if !SUPPORTED_MEDIA_TYPES.contains(&media_type) {
            return Err(ExtractionError::UnsupportedMediaType(media_type.to_string()));
        }

        debug!(
            "调用 LLM API，模型: {}，图片类型: {}，base64 长度: {}",
            self.model_name,
            media_type,
            base64_data.len()
        );

        let messages = self.build_request_messages(media_type, base64_data)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(self.max_tokens)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    name: SCHEMA_NAME.to_string(),
                    description: Some("Data extracted from a student reading log".to_string()),
                    schema: Some(reading_log_schema()),
                    strict: Some(true),
                },
            })
            .build()
            .map_err(|e| ExtractionError::RequestBuild(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            debug!("LLM API 调用失败: {}", e);
            ExtractionError::ApiCallFailed {
                model: self.model_name.clone(),
                message: e.to_string(),
            }
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ExtractionError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        parse_reading_log(&content)
    }
}

/// 提取服务接受的 media type
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// 构建提取提示词
pub fn build_prompt() -> String {
    let days = FORM_DAYS
        .iter()
        .map(|(day, date)| format!("{} {}", day, date))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Analyze this reading log image carefully. Extract the following information exactly as written:

1. The student's full name
2. The grade level
3. The homeroom teacher's name

Then for each day listed on the reading log ({}), extract the reading time as a number of minutes (integer only, e.g. if it says "10 min" or "10mi" return 10). If a day has no reading time filled in, use 0.

Return all information in the structured JSON format requested."#,
        days
    )
}

/// 解析模型返回的 JSON
///
/// 部分兼容服务会把 JSON 包在 ```json 代码块里，这里一并去掉。
pub fn parse_reading_log(content: &str) -> Result<ReadingLog, ExtractionError> {
    let trimmed = strip_code_fence(content.trim());
    serde_json::from_str(trimmed).map_err(|source| ExtractionError::InvalidJson {
        raw: truncate_text(content, 500),
        source,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
