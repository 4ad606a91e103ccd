mod ffprobe_info;
mod file_scanner;
mod path_validator;
mod tool_checker;

pub use ffprobe_info::{MediaInfo, get_audio_duration, get_image_dimensions, probe_media};
pub use file_scanner::{OrderedFile, SlideKey, scan_first_nonempty, scan_sorted_files};
pub use path_validator::{
    ensure_directory_exists, ensure_parent_directory, validate_directory_exists,
};
pub use tool_checker::{check_media_capabilities, list_ffmpeg_encoders, require_tool};
