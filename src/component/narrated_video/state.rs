use std::fmt;

/// 整體執行狀態
///
/// `Idle → Enumerating → Matching → TimingResolved → Composing → {Done | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Enumerating,
    Matching,
    TimingResolved,
    Composing,
    Done,
    Failed,
}

impl RunState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// 檢查狀態轉換是否合法，任何非終止狀態都可以進入 Failed
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Enumerating)
                | (Self::Enumerating, Self::Matching)
                | (Self::Matching, Self::TimingResolved)
                | (Self::TimingResolved, Self::Composing)
                | (Self::Composing, Self::Done)
        ) || (!self.is_terminal() && matches!(next, Self::Failed))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Enumerating => "enumerating",
            Self::Matching => "matching",
            Self::TimingResolved => "timing",
            Self::Composing => "composing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
