use super::duration::{DurationProbe, resolve_duration};
use super::matcher::SlideMatch;
use super::{NarrationAsset, SlideAsset};
use log::info;

/// 片段使用的旁白與其解析後的長度
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationClip {
    pub asset: NarrationAsset,
    pub duration_seconds: f64,
}

/// 時間軸上的一張投影片
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSegment {
    pub slide: SlideAsset,
    pub narration: Option<NarrationClip>,
    /// 實際顯示長度（秒）
    pub duration_seconds: f64,
}

impl TimelineSegment {
    #[must_use]
    pub const fn is_narrated(&self) -> bool {
        self.narration.is_some()
    }
}

/// 依投影片順序排列、長度已決定的片段序列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    segments: Vec<TimelineSegment>,
}

impl Timeline {
    #[must_use]
    pub const fn new(segments: Vec<TimelineSegment>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[TimelineSegment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_seconds).sum()
    }

    #[must_use]
    pub fn narrated_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_narrated()).count()
    }

    /// 至少一張投影片有旁白時，輸出才需要音軌
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.segments.iter().any(TimelineSegment::is_narrated)
    }
}

/// 為每個配對結果決定顯示長度
///
/// 有旁白時取旁白長度與預設長度的較大者，否則使用預設長度
pub fn build_timeline<P: DurationProbe + ?Sized>(
    matches: &[SlideMatch<'_>],
    probe: &P,
    default_seconds: f64,
) -> Timeline {
    let segments = matches
        .iter()
        .enumerate()
        .map(|(index, slide_match)| {
            let narration = slide_match.narration.map(|asset| NarrationClip {
                asset: asset.clone(),
                duration_seconds: resolve_duration(probe, &asset.path, default_seconds),
            });

            let duration_seconds = match &narration {
                Some(clip) => {
                    let seconds = clip.duration_seconds.max(default_seconds);
                    info!(
                        "投影片 {}: 使用旁白 {}，長度 {seconds:.2}s",
                        index + 1,
                        clip.asset.file_name()
                    );
                    seconds
                }
                None => {
                    info!(
                        "投影片 {}: 找不到旁白，使用預設長度 {default_seconds:.2}s",
                        index + 1
                    );
                    default_seconds
                }
            };

            TimelineSegment {
                slide: slide_match.slide.clone(),
                narration,
                duration_seconds,
            }
        })
        .collect();

    Timeline::new(segments)
}
