use super::composer::{EncodeSettings, Muxer, compose};
use super::duration::{DurationProbe, FfprobeDuration};
use super::ffmpeg_muxer::FfmpegMuxer;
use super::matcher::match_narrations;
use super::state::RunState;
use super::timeline::build_timeline;
use super::{NarrationAsset, SlideAsset};
use crate::config::{SLIDE_EXTENSIONS, Settings};
use crate::error::PipelineError;
use crate::tools::{
    check_media_capabilities, scan_first_nonempty, scan_sorted_files, validate_directory_exists,
};
use console::style;
use log::{debug, error, info};
use std::path::PathBuf;

/// 成功執行後的摘要
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub slide_count: usize,
    pub narrated_count: usize,
    pub total_duration: f64,
}

impl RunReport {
    pub fn print_summary(&self) {
        println!();
        println!("{}", style("=== 影片合成結果 ===").cyan().bold());
        println!("  投影片: {} 張", self.slide_count);
        println!("  有旁白: {} 張", style(self.narrated_count).green());
        println!("  總長度: {:.2}s", self.total_duration);
        println!(
            "  輸出: {}",
            style(self.output_path.display()).green().bold()
        );
    }
}

/// 確認 ffmpeg、ffprobe 與所需編碼器都可用，在進入流程前呼叫
pub fn check_capabilities(settings: &EncodeSettings) -> Result<(), PipelineError> {
    check_media_capabilities(&settings.encoders()).map_err(PipelineError::Config)
}

/// 投影片旁白影片產生器
///
/// 流程：列舉素材 → 配對旁白 → 決定每張投影片長度 → 合成輸出
pub struct NarratedVideo<P = FfprobeDuration, M = FfmpegMuxer> {
    settings: Settings,
    probe: P,
    muxer: M,
    state: RunState,
}

impl NarratedVideo {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_collaborators(settings, FfprobeDuration, FfmpegMuxer::default())
    }
}

impl<P: DurationProbe, M: Muxer> NarratedVideo<P, M> {
    pub fn with_collaborators(settings: Settings, probe: P, muxer: M) -> Self {
        Self {
            settings,
            probe,
            muxer,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub const fn muxer(&self) -> &M {
        &self.muxer
    }

    /// 執行完整流程
    ///
    /// 每個實例只能執行一次，再次呼叫回傳 `PipelineError::AlreadyRun`，狀態不變
    pub fn run(&mut self) -> Result<RunReport, PipelineError> {
        if self.state != RunState::Idle {
            return Err(PipelineError::AlreadyRun { state: self.state });
        }

        let result = self.run_stages();
        match &result {
            Ok(report) => {
                self.transition(RunState::Done);
                info!("執行完成: {}", report.output_path.display());
            }
            Err(e) => {
                error!("執行失敗 [{}]: {e}", e.stage());
                self.transition(RunState::Failed);
            }
        }
        result
    }

    fn transition(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {next}",
            self.state
        );
        debug!("狀態: {} -> {next}", self.state);
        self.state = next;
    }

    fn validate_inputs(&self) -> Result<(), PipelineError> {
        validate_directory_exists(&self.settings.slides_dir).map_err(PipelineError::Config)?;
        validate_directory_exists(&self.settings.narration_dir).map_err(PipelineError::Config)
    }

    fn enumerate(&self) -> Result<(Vec<SlideAsset>, Vec<NarrationAsset>), PipelineError> {
        let stage_error = |source| PipelineError::Stage {
            stage: RunState::Enumerating,
            source,
        };

        let slides = scan_first_nonempty(&self.settings.slides_dir, &SLIDE_EXTENSIONS)
            .map_err(stage_error)?;
        if slides.is_empty() {
            return Err(PipelineError::NoSlides {
                stage: RunState::Enumerating,
                dir: self.settings.slides_dir.clone(),
            });
        }

        let narrations =
            scan_sorted_files(&self.settings.narration_dir, &self.settings.audio_format)
                .map_err(stage_error)?;

        info!(
            "找到 {} 張投影片與 {} 個旁白檔",
            slides.len(),
            narrations.len()
        );
        Ok((slides, narrations))
    }

    fn run_stages(&mut self) -> Result<RunReport, PipelineError> {
        self.validate_inputs()?;

        self.transition(RunState::Enumerating);
        let (slides, narrations) = self.enumerate()?;

        self.transition(RunState::Matching);
        let matches = match_narrations(&slides, &narrations);
        let timeline = build_timeline(&matches, &self.probe, self.settings.slide_duration);
        self.transition(RunState::TimingResolved);

        self.transition(RunState::Composing);
        let encode_settings = EncodeSettings::from_settings(&self.settings);
        compose(&timeline, &encode_settings, &self.muxer)?;

        Ok(RunReport {
            output_path: encode_settings.output_path,
            slide_count: timeline.len(),
            narrated_count: timeline.narrated_count(),
            total_duration: timeline.total_duration(),
        })
    }
}
