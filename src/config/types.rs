use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_SLIDE_DURATION: f64 = 5.0;
pub const DEFAULT_FPS: u32 = 24;
pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";

/// 投影片圖片副檔名，依優先順序排列
pub const SLIDE_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// 一次執行所需的完整設定
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub slides_dir: PathBuf,
    pub narration_dir: PathBuf,
    pub output_path: PathBuf,
    /// 無旁白投影片的長度，同時也是有旁白投影片的最短長度（秒）
    pub slide_duration: f64,
    pub fps: u32,
    /// 旁白檔副檔名（不含前導點）
    pub audio_format: String,
}

impl Settings {
    #[must_use]
    pub fn new(slides_dir: PathBuf, narration_dir: PathBuf, output_path: PathBuf) -> Self {
        Self {
            slides_dir,
            narration_dir,
            output_path,
            slide_duration: DEFAULT_SLIDE_DURATION,
            fps: DEFAULT_FPS,
            audio_format: DEFAULT_AUDIO_FORMAT.to_string(),
        }
    }
}

/// JSON 設定檔內容，每個欄位皆可省略
///
/// 同時接受命令列參數的長名稱（例如 `slides`、`audio-format`）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsOverride {
    #[serde(alias = "slides")]
    pub slides_dir: Option<PathBuf>,
    #[serde(alias = "narration")]
    pub narration_dir: Option<PathBuf>,
    #[serde(alias = "output")]
    pub output_path: Option<PathBuf>,
    #[serde(alias = "duration")]
    pub slide_duration: Option<f64>,
    pub fps: Option<u32>,
    #[serde(alias = "audio-format")]
    pub audio_format: Option<String>,
}
