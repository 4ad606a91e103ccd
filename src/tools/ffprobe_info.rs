use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    pub duration_seconds: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub has_audio: bool,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得媒體資訊（音訊或圖片）
pub fn probe_media(path: &Path) -> Result<MediaInfo> {
    if !path.exists() {
        bail!("檔案不存在: {}", path.display());
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ffprobe_output(&stdout)
}

fn parse_ffprobe_output(json: &str) -> Result<MediaInfo> {
    let probe: FfprobeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;
    let streams = probe.streams.unwrap_or_default();

    let audio_stream = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));
    let video_stream = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    // 優先從 format 取得長度，其次從音訊串流
    let parse = |d: &str| d.parse::<f64>().ok();
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(parse)
        .or_else(|| audio_stream.and_then(|s| s.duration.as_deref()).and_then(parse));

    Ok(MediaInfo {
        duration_seconds,
        width: video_stream.and_then(|s| s.width),
        height: video_stream.and_then(|s| s.height),
        has_audio: audio_stream.is_some(),
    })
}

/// 取得音訊長度（秒），結果必須為正數
pub fn get_audio_duration(path: &Path) -> Result<f64> {
    let info = probe_media(path)?;
    let duration = info
        .duration_seconds
        .ok_or_else(|| anyhow!("無法取得音訊長度: {}", path.display()))?;

    if !duration.is_finite() || duration <= 0.0 {
        bail!("音訊長度無效 ({duration}): {}", path.display());
    }
    Ok(duration)
}

/// 取得圖片寬高
pub fn get_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    let info = probe_media(path)?;
    match (info.width, info.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => bail!("無法取得圖片尺寸: {}", path.display()),
    }
}
