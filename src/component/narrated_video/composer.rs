//! 時間軸合成
//!
//! 驗證時間軸後交給 `Muxer` 編碼，並確認輸出檔案確實寫入

use super::timeline::Timeline;
use crate::config::Settings;
use crate::tools::ensure_parent_directory;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// 旁白長度與片段長度比較時的容許誤差（秒）
const DURATION_TOLERANCE: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("時間軸為空，沒有可合成的投影片")]
    EmptyTimeline,

    /// `slide` 為從 1 開始的投影片序號
    #[error("投影片 {slide} 的長度無效: {duration}")]
    InvalidDuration { slide: usize, duration: f64 },

    #[error("投影片 {slide} 的旁白長度 ({narration:.3}s) 超過片段長度 ({duration:.3}s)")]
    NarrationOverrun {
        slide: usize,
        narration: f64,
        duration: f64,
    },

    #[error("無法建立輸出資料夾: {0:#}")]
    OutputDirectory(anyhow::Error),

    #[error("投影片 {slide} 無法讀取 ({}): {source:#}", path.display())]
    SlideProbe {
        slide: usize,
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("{tool} 執行失敗: {message}")]
    Muxer { tool: String, message: String },

    #[error("輸出檔案未建立或為空: {}", path.display())]
    MissingOutput { path: PathBuf },

    #[error("I/O 錯誤: {0}")]
    Io(#[from] std::io::Error),
}

/// 交給編碼器的輸出設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub output_path: PathBuf,
    pub fps: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub sample_rate: u32,
}

impl EncodeSettings {
    #[must_use]
    pub fn new(output_path: &Path, fps: u32) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            fps,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.output_path, settings.fps)
    }

    #[must_use]
    pub fn encoders(&self) -> [&str; 2] {
        [self.video_codec.as_str(), self.audio_codec.as_str()]
    }
}

/// 外部編碼器：把時間軸編碼成 `settings.output_path`
pub trait Muxer {
    fn encode(&self, timeline: &Timeline, settings: &EncodeSettings) -> Result<(), ComposeError>;
}

/// 檢查每個片段的長度，並確認旁白不會超出片段
pub fn validate_timeline(timeline: &Timeline) -> Result<(), ComposeError> {
    if timeline.is_empty() {
        return Err(ComposeError::EmptyTimeline);
    }

    for (index, segment) in timeline.segments().iter().enumerate() {
        let duration = segment.duration_seconds;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ComposeError::InvalidDuration {
                slide: index + 1,
                duration,
            });
        }

        if let Some(clip) = &segment.narration {
            if clip.duration_seconds > duration + DURATION_TOLERANCE {
                return Err(ComposeError::NarrationOverrun {
                    slide: index + 1,
                    narration: clip.duration_seconds,
                    duration,
                });
            }
        }
    }
    Ok(())
}

/// 合成時間軸，只有在輸出檔案存在且非空時才回報成功
///
/// 編碼器寫入同資料夾的暫存檔，成功後才取代 `output_path`。
/// 失敗時刪除暫存檔，原有的輸出檔案保持不變
pub fn compose<M: Muxer + ?Sized>(
    timeline: &Timeline,
    settings: &EncodeSettings,
    muxer: &M,
) -> Result<(), ComposeError> {
    validate_timeline(timeline)?;
    ensure_parent_directory(&settings.output_path).map_err(ComposeError::OutputDirectory)?;

    info!(
        "開始合成 {} 個片段，總長度 {:.2}s -> {}",
        timeline.len(),
        timeline.total_duration(),
        settings.output_path.display()
    );

    let staging = staging_file(&settings.output_path)?;
    let staged_settings = EncodeSettings {
        output_path: staging.path().to_path_buf(),
        ..settings.clone()
    };
    debug!("暫存輸出: {}", staging.path().display());

    muxer.encode(timeline, &staged_settings)?;

    let output_valid = fs::metadata(staging.path())
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false);
    if !output_valid {
        return Err(ComposeError::MissingOutput {
            path: settings.output_path.clone(),
        });
    }

    staging
        .persist(&settings.output_path)
        .map_err(|e| ComposeError::Io(e.error))?;

    info!("影片已建立: {}", settings.output_path.display());
    Ok(())
}

/// 在輸出資料夾建立暫存檔，保留副檔名讓編碼器判斷容器格式
fn staging_file(output_path: &Path) -> Result<NamedTempFile, ComposeError> {
    let directory = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = output_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut builder = tempfile::Builder::new();
    builder.prefix(".partial-").suffix(&suffix);
    // 暫存檔預設權限為 0600，改為一般輸出檔案的權限
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    Ok(builder.tempfile_in(directory)?)
}
