//! 執行流程的錯誤類型

use crate::component::narrated_video::{ComposeError, RunState};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 設定、輸入路徑或外部工具有問題，任何階段開始前回報
    #[error("設定錯誤: {0:#}")]
    Config(anyhow::Error),

    #[error("[{stage}] 找不到任何投影片圖片 (png/jpg): {}", dir.display())]
    NoSlides { stage: RunState, dir: PathBuf },

    #[error("[{stage}] {source:#}")]
    Stage {
        stage: RunState,
        source: anyhow::Error,
    },

    #[error("[composing] {0}")]
    Compose(#[from] ComposeError),

    /// 同一個實例已經執行過
    #[error("[{state}] 流程已執行過，請建立新的實例")]
    AlreadyRun { state: RunState },
}

impl PipelineError {
    /// 發生錯誤的階段，設定錯誤回傳 `Idle`
    #[must_use]
    pub const fn stage(&self) -> RunState {
        match self {
            Self::Config(_) => RunState::Idle,
            Self::NoSlides { stage, .. } | Self::Stage { stage, .. } => *stage,
            Self::Compose(_) => RunState::Composing,
            Self::AlreadyRun { state } => *state,
        }
    }
}
