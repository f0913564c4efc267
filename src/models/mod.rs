pub mod checkpoint;
pub mod image_format;
pub mod reading_log;
pub mod schema;

pub use checkpoint::Progress;
pub use image_format::ImageFormat;
pub use reading_log::{ReadingEntry, ReadingLog, FORM_DAYS};
