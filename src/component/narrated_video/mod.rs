//! 投影片旁白影片元件
//!
//! 將排序後的投影片圖片與旁白音訊配對，依旁白長度決定每張投影片的顯示時間，
//! 再以 ffmpeg 串接成單一影片

mod composer;
mod duration;
mod ffmpeg_command;
mod ffmpeg_muxer;
mod main;
mod matcher;
mod state;
mod timeline;

use crate::tools::OrderedFile;

pub type SlideAsset = OrderedFile;
pub type NarrationAsset = OrderedFile;

pub use composer::{
    ComposeError, DEFAULT_AUDIO_CODEC, DEFAULT_SAMPLE_RATE, DEFAULT_VIDEO_CODEC, EncodeSettings,
    Muxer, compose, validate_timeline,
};
pub use duration::{DurationProbe, FfprobeDuration, resolve_duration};
pub use ffmpeg_command::{Canvas, FfmpegCommand};
pub use ffmpeg_muxer::FfmpegMuxer;
pub use main::{NarratedVideo, RunReport, check_capabilities};
pub use matcher::{SlideMatch, find_narration, match_narrations};
pub use state::RunState;
pub use timeline::{NarrationClip, Timeline, TimelineSegment, build_timeline};
