use clap::Parser;
use slide_narration_video::config::{
    DEFAULT_AUDIO_FORMAT, DEFAULT_FPS, DEFAULT_SLIDE_DURATION, Settings,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "slide-narration-video")]
#[command(author, version, about = "將投影片圖片與旁白音訊合成為影片")]
pub struct Cli {
    /// 投影片圖片資料夾（PNG 或 JPG）
    #[arg(short = 's', long)]
    pub slides: PathBuf,

    /// 旁白音訊資料夾
    #[arg(short = 'n', long)]
    pub narration: PathBuf,

    /// 輸出影片路徑
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// 無旁白投影片的顯示長度（秒），也是有旁白投影片的最短長度
    #[arg(short = 'd', long, default_value_t = DEFAULT_SLIDE_DURATION)]
    pub duration: f64,

    /// 輸出影片幀率
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    /// 旁白音訊格式（副檔名）
    #[arg(long, default_value = DEFAULT_AUDIO_FORMAT)]
    pub audio_format: String,

    /// JSON 設定檔，可覆寫以上任一設定
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// 顯示除錯日誌
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            slides_dir: self.slides.clone(),
            narration_dir: self.narration.clone(),
            output_path: self.output.clone(),
            slide_duration: self.duration,
            fps: self.fps,
            audio_format: self.audio_format.clone(),
        }
    }
}
