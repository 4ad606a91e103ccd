use super::composer::{ComposeError, EncodeSettings, Muxer};
use super::ffmpeg_command::{Canvas, FfmpegCommand};
use super::timeline::Timeline;
use crate::tools::get_image_dimensions;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::process::Stdio;
use tempfile::NamedTempFile;

/// 以 ffmpeg 行程編碼
///
/// 濾鏡腳本與 stderr 皆寫入暫存檔，編碼結束（含失敗）時自動刪除
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegMuxer {
    /// 不顯示進度條（非互動環境或測試）
    pub quiet: bool,
}

impl FfmpegMuxer {
    #[must_use]
    pub const fn quiet() -> Self {
        Self { quiet: true }
    }

    fn probe_canvas(timeline: &Timeline) -> Result<Canvas, ComposeError> {
        let mut dimensions = Vec::with_capacity(timeline.len());
        for (index, segment) in timeline.segments().iter().enumerate() {
            let size = get_image_dimensions(&segment.slide.path).map_err(|source| {
                ComposeError::SlideProbe {
                    slide: index + 1,
                    path: segment.slide.path.clone(),
                    source,
                }
            })?;
            dimensions.push(size);
        }

        Canvas::from_dimensions(&dimensions).ok_or(ComposeError::EmptyTimeline)
    }

    fn progress_bar(&self, total_ms: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total_ms);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        progress_bar.set_style(style);
        progress_bar.set_message("編碼中...");
        progress_bar
    }

    /// 解析 `out_time_ms`（實際單位為微秒）或 `out_time=HH:MM:SS.micro`
    fn parse_out_time_ms(raw: &str) -> Option<u64> {
        if let Ok(us) = raw.parse::<u64>() {
            return Some(us / 1000);
        }

        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() == 3 {
            let h = parts[0].parse::<u64>().ok()?;
            let m = parts[1].parse::<u64>().ok()?;
            let (s, micro) = match parts[2].split_once('.') {
                Some((sec, frac)) => (sec.parse::<u64>().ok()?, frac.parse::<u64>().unwrap_or(0)),
                None => (parts[2].parse::<u64>().ok()?, 0),
            };
            return Some((h * 3600 + m * 60 + s) * 1000 + micro / 1000);
        }
        None
    }

    /// 讀回 ffmpeg 的 stderr，非 UTF-8 內容（例如檔名）以替代字元保留
    fn read_stderr(stderr_file: &mut std::fs::File) -> String {
        let mut bytes = Vec::new();
        if let Err(e) = stderr_file
            .seek(SeekFrom::Start(0))
            .and_then(|_| stderr_file.read_to_end(&mut bytes))
        {
            debug!("無法讀取 ffmpeg stderr: {e}");
        }
        let message = String::from_utf8_lossy(&bytes);
        let message = message.trim();
        if message.is_empty() {
            "未知錯誤".to_string()
        } else {
            message.to_string()
        }
    }
}

impl Muxer for FfmpegMuxer {
    fn encode(&self, timeline: &Timeline, settings: &EncodeSettings) -> Result<(), ComposeError> {
        let canvas = Self::probe_canvas(timeline)?;
        debug!("輸出尺寸: {}x{}", canvas.width, canvas.height);

        let ffmpeg_cmd = FfmpegCommand::new(timeline, settings, canvas);

        let mut filter_script = NamedTempFile::new()?;
        filter_script.write_all(ffmpeg_cmd.build_filter_graph().as_bytes())?;
        filter_script.flush()?;

        let mut stderr_file = tempfile::tempfile()?;

        let mut command = ffmpeg_cmd.build_command(filter_script.path());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::from(stderr_file.try_clone()?));
        debug!("執行 ffmpeg: {command:?}");

        let mut child = command.spawn().map_err(|e| ComposeError::Muxer {
            tool: "ffmpeg".to_string(),
            message: format!("無法啟動 ffmpeg: {e}"),
        })?;

        let total_ms = (timeline.total_duration() * 1000.0).round() as u64;
        let progress_bar = self.progress_bar(total_ms);

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                if let Some(("out_time_ms", value)) = line.trim().split_once('=') {
                    if let Some(current_ms) = Self::parse_out_time_ms(value) {
                        progress_bar.set_position(current_ms.min(total_ms));
                    }
                }
            }
        }

        let status = child.wait()?;
        if !status.success() {
            progress_bar.abandon_with_message("編碼失敗");
            let message = Self::read_stderr(&mut stderr_file);
            error!("ffmpeg 編碼失敗 ({status}): {message}");
            return Err(ComposeError::Muxer {
                tool: "ffmpeg".to_string(),
                message: format!("{status}: {message}"),
            });
        }

        progress_bar.finish_with_message("完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::narrated_video::timeline::TimelineSegment;
    use crate::tools::{OrderedFile, SlideKey};
    use std::path::{Path, PathBuf};

    #[test]
    fn test_parse_out_time_microseconds() {
        assert_eq!(FfmpegMuxer::parse_out_time_ms("2500000"), Some(2500));
    }

    #[test]
    fn test_parse_out_time_clock() {
        assert_eq!(
            FfmpegMuxer::parse_out_time_ms("00:01:02.500000"),
            Some(62_500)
        );
        assert_eq!(FfmpegMuxer::parse_out_time_ms("00:00:03"), Some(3000));
        assert_eq!(FfmpegMuxer::parse_out_time_ms("N/A"), None);
    }

    #[test]
    fn test_read_stderr_keeps_non_utf8_message() {
        let mut stderr_file = tempfile::tempfile().unwrap();
        stderr_file
            .write_all(b"Error opening input file /deck/slide\xff1.png: No such file\n")
            .unwrap();

        let message = FfmpegMuxer::read_stderr(&mut stderr_file);

        assert!(message.starts_with("Error opening input file /deck/slide"));
        assert!(message.ends_with("1.png: No such file"));
        assert!(message.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_stderr_empty_is_unknown() {
        let mut stderr_file = tempfile::tempfile().unwrap();
        assert_eq!(FfmpegMuxer::read_stderr(&mut stderr_file), "未知錯誤");
    }

    #[test]
    fn test_unreadable_slide_names_slide_index() {
        let timeline = Timeline::new(vec![TimelineSegment {
            slide: OrderedFile {
                position: 0,
                key: SlideKey::from_stem("slide1"),
                path: PathBuf::from("/nonexistent/slide1.png"),
            },
            narration: None,
            duration_seconds: 5.0,
        }]);
        let settings = EncodeSettings::new(Path::new("/nonexistent/out.mp4"), 24);

        let result = FfmpegMuxer::quiet().encode(&timeline, &settings);

        assert!(matches!(
            result,
            Err(ComposeError::SlideProbe { slide: 1, .. })
        ));
    }
}
