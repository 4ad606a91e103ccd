pub mod load;
pub mod types;

pub use load::load_overrides;
pub use types::{
    DEFAULT_AUDIO_FORMAT, DEFAULT_FPS, DEFAULT_SLIDE_DURATION, SLIDE_EXTENSIONS, Settings,
    SettingsOverride,
};
