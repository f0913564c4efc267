use std::path::Path;

/// 支持的图片格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// 苹果相册默认格式，需要先转换
    Heic,
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// 从扩展名解析格式（不区分大小写）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "heic" => Some(ImageFormat::Heic),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    /// 从文件路径解析格式
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }

    /// 提交给提取服务的 media type，HEIC 没有
    pub fn media_type(self) -> Option<&'static str> {
        match self {
            ImageFormat::Heic => None,
            ImageFormat::Jpeg => Some("image/jpeg"),
            ImageFormat::Png => Some("image/png"),
            ImageFormat::Gif => Some("image/gif"),
            ImageFormat::Webp => Some("image/webp"),
        }
    }

    /// 是否需要先转换为标准格式
    pub fn needs_conversion(self) -> bool {
        matches!(self, ImageFormat::Heic)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImageFormat::Heic => "HEIC",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Webp => "WEBP",
        };
        write!(f, "{}", name)
    }
}
