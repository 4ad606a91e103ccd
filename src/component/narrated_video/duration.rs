//! 旁白長度解析
//!
//! 探測失敗時退回預設投影片長度，不會中斷整體流程

use crate::tools::get_audio_duration;
use anyhow::Result;
use log::warn;
use std::path::Path;

/// 取得音訊長度的外部能力
pub trait DurationProbe {
    fn probe_seconds(&self, path: &Path) -> Result<f64>;
}

/// 以 ffprobe 探測長度
#[derive(Debug, Default, Clone, Copy)]
pub struct FfprobeDuration;

impl DurationProbe for FfprobeDuration {
    fn probe_seconds(&self, path: &Path) -> Result<f64> {
        get_audio_duration(path)
    }
}

/// 回傳旁白長度（秒），失敗或結果非正數時回傳 `default_seconds`
pub fn resolve_duration<P: DurationProbe + ?Sized>(
    probe: &P,
    path: &Path,
    default_seconds: f64,
) -> f64 {
    match probe.probe_seconds(path) {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
        Ok(seconds) => {
            warn!(
                "旁白長度無效 ({seconds}): {}，改用預設長度 {default_seconds:.2}s",
                path.display()
            );
            default_seconds
        }
        Err(e) => {
            warn!(
                "無法取得旁白長度 {}: {e:#}，改用預設長度 {default_seconds:.2}s",
                path.display()
            );
            default_seconds
        }
    }
}
