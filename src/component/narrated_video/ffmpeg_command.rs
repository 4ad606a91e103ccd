use super::composer::EncodeSettings;
use super::timeline::Timeline;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// 輸出畫面尺寸
///
/// 取所有投影片的最大寬高並進位成偶數（yuv420p 需要偶數尺寸），
/// 較小的投影片置中並補黑邊
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    #[must_use]
    pub fn from_dimensions(dimensions: &[(u32, u32)]) -> Option<Self> {
        let width = dimensions.iter().map(|(w, _)| *w).max()?;
        let height = dimensions.iter().map(|(_, h)| *h).max()?;
        Some(Self {
            width: round_up_even(width),
            height: round_up_even(height),
        })
    }
}

const fn round_up_even(value: u32) -> u32 {
    value + (value % 2)
}

fn file_input(path: &Path) -> OsString {
    let mut input = OsString::from("file:");
    input.push(path.as_os_str());
    input
}

pub struct FfmpegCommand<'a> {
    timeline: &'a Timeline,
    settings: &'a EncodeSettings,
    canvas: Canvas,
}

impl<'a> FfmpegCommand<'a> {
    #[must_use]
    pub const fn new(timeline: &'a Timeline, settings: &'a EncodeSettings, canvas: Canvas) -> Self {
        Self {
            timeline,
            settings,
            canvas,
        }
    }

    /// 建立 filter_complex 內容
    ///
    /// 每張投影片先縮放補邊並裁成片段長度；有音軌時每個片段都配一段音訊
    /// （無旁白的片段使用靜音），旁白不足的部分以 apad 補靜音，
    /// 最後以 concat 依序串接。
    #[must_use]
    pub fn build_filter_graph(&self) -> String {
        let Canvas { width, height } = self.canvas;
        let fps = self.settings.fps;
        let sample_rate = self.settings.sample_rate;
        let with_audio = self.timeline.has_audio();

        let mut chains = Vec::new();
        let mut concat_inputs = String::new();
        let mut input_index = 0;

        for (i, segment) in self.timeline.segments().iter().enumerate() {
            let duration = format!("{:.6}", segment.duration_seconds);

            chains.push(format!(
                "[{input_index}:v]scale={width}:{height}:force_original_aspect_ratio=decrease,\
                 pad={width}:{height}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1,\
                 fps={fps},format=yuv420p,trim=duration={duration},setpts=PTS-STARTPTS[v{i}]"
            ));
            input_index += 1;
            concat_inputs.push_str(&format!("[v{i}]"));

            if !with_audio {
                continue;
            }

            if segment.narration.is_some() {
                chains.push(format!(
                    "[{input_index}:a]aresample={sample_rate},\
                     aformat=sample_fmts=fltp:channel_layouts=stereo,apad,\
                     atrim=duration={duration},asetpts=PTS-STARTPTS[a{i}]"
                ));
                input_index += 1;
            } else {
                chains.push(format!(
                    "anullsrc=channel_layout=stereo:sample_rate={sample_rate},\
                     aformat=sample_fmts=fltp:channel_layouts=stereo,\
                     atrim=duration={duration},asetpts=PTS-STARTPTS[a{i}]"
                ));
            }
            concat_inputs.push_str(&format!("[a{i}]"));
        }

        let count = self.timeline.len();
        if with_audio {
            chains.push(format!(
                "{concat_inputs}concat=n={count}:v=1:a=1[vout][aout]"
            ));
        } else {
            chains.push(format!("{concat_inputs}concat=n={count}:v=1:a=0[vout]"));
        }

        chains.join(";\n")
    }

    /// `filter_script` 為寫入 `build_filter_graph` 內容的檔案
    #[must_use]
    pub fn build_command(&self, filter_script: &Path) -> Command {
        let fps = self.settings.fps.to_string();
        let mut cmd = Command::new("ffmpeg");

        cmd.args([
            "-hide_banner",
            "-nostdin",
            "-nostats",
            "-loglevel", "error",
            "-progress", "pipe:1",
            "-y",
        ]);

        for segment in self.timeline.segments() {
            cmd.args(["-loop", "1", "-framerate", &fps]);
            cmd.args(["-t", &format!("{:.6}", segment.duration_seconds)]);
            cmd.arg("-i").arg(file_input(&segment.slide.path));

            if let Some(clip) = &segment.narration {
                cmd.arg("-i").arg(file_input(&clip.asset.path));
            }
        }

        cmd.arg("-filter_complex_script").arg(filter_script);
        cmd.args(["-map", "[vout]"]);
        cmd.args([
            "-c:v", &self.settings.video_codec,
            "-pix_fmt", "yuv420p",
            "-r", &fps,
        ]);

        if self.timeline.has_audio() {
            cmd.args(["-map", "[aout]"]);
            cmd.args([
                "-c:a", &self.settings.audio_codec,
                "-ar", &self.settings.sample_rate.to_string(),
            ]);
        } else {
            cmd.arg("-an");
        }

        cmd.args(["-movflags", "+faststart"]);
        cmd.arg(&self.settings.output_path);

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::narrated_video::timeline::{NarrationClip, TimelineSegment};
    use crate::tools::{OrderedFile, SlideKey};
    use std::path::PathBuf;

    fn asset(position: usize, name: &str) -> OrderedFile {
        OrderedFile {
            position,
            key: SlideKey::from_stem(name),
            path: PathBuf::from(format!("/deck/{name}")),
        }
    }

    fn timeline(narrated: &[bool]) -> Timeline {
        Timeline::new(
            narrated
                .iter()
                .enumerate()
                .map(|(i, has_narration)| TimelineSegment {
                    slide: asset(i, &format!("slide{}.png", i + 1)),
                    narration: has_narration.then(|| NarrationClip {
                        asset: asset(i, &format!("narration_slide{}.mp3", i + 1)),
                        duration_seconds: 6.5,
                    }),
                    duration_seconds: if *has_narration { 6.5 } else { 5.0 },
                })
                .collect(),
        )
    }

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    const CANVAS: Canvas = Canvas {
        width: 1280,
        height: 720,
    };

    #[test]
    fn test_canvas_uses_largest_even_dimensions() {
        let canvas = Canvas::from_dimensions(&[(1279, 720), (800, 601)]).unwrap();
        assert_eq!(canvas, Canvas { width: 1280, height: 720 });

        let canvas = Canvas::from_dimensions(&[(641, 481)]).unwrap();
        assert_eq!(canvas, Canvas { width: 642, height: 482 });

        assert!(Canvas::from_dimensions(&[]).is_none());
    }

    #[test]
    fn test_filter_graph_with_mixed_audio() {
        let timeline = timeline(&[false, true, false]);
        let settings = EncodeSettings::new(Path::new("/out/video.mp4"), 24);

        let graph = FfmpegCommand::new(&timeline, &settings, CANVAS).build_filter_graph();

        // 投影片 0 -> 輸入 0，投影片 1 -> 輸入 1 + 旁白輸入 2，投影片 2 -> 輸入 3
        assert!(graph.contains("[0:v]scale=1280:720"));
        assert!(graph.contains("[1:v]scale=1280:720"));
        assert!(graph.contains("[2:a]aresample=44100"));
        assert!(graph.contains("[3:v]scale=1280:720"));
        assert!(graph.contains("trim=duration=6.500000,setpts=PTS-STARTPTS[v1]"));
        assert!(graph.contains("atrim=duration=6.500000,asetpts=PTS-STARTPTS[a1]"));
        assert_eq!(graph.matches("anullsrc").count(), 2);
        assert!(graph.ends_with("[v0][a0][v1][a1][v2][a2]concat=n=3:v=1:a=1[vout][aout]"));
    }

    #[test]
    fn test_filter_graph_without_audio() {
        let timeline = timeline(&[false, false]);
        let settings = EncodeSettings::new(Path::new("/out/video.mp4"), 30);

        let graph = FfmpegCommand::new(&timeline, &settings, CANVAS).build_filter_graph();

        assert!(!graph.contains("anullsrc"));
        assert!(graph.contains("fps=30"));
        assert!(graph.ends_with("[v0][v1]concat=n=2:v=1:a=0[vout]"));
    }

    #[test]
    fn test_build_command_inputs_in_slide_order() {
        let timeline = timeline(&[true, false]);
        let settings = EncodeSettings::new(Path::new("/out/video.mp4"), 24);

        let cmd = FfmpegCommand::new(&timeline, &settings, CANVAS)
            .build_command(Path::new("/tmp/filter.txt"));
        let args = args_of(&cmd);

        let inputs: Vec<&String> = args
            .iter()
            .zip(args.iter().skip(1))
            .filter(|(flag, _)| flag.as_str() == "-i")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(
            inputs,
            [
                "file:/deck/slide1.png",
                "file:/deck/narration_slide1.mp3",
                "file:/deck/slide2.png"
            ]
        );
        assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "6.500000"));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[aout]"));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
        assert!(args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "aac"));
        assert_eq!(args.last().unwrap(), "/out/video.mp4");
    }

    #[test]
    fn test_build_command_without_audio_drops_audio_track() {
        let timeline = timeline(&[false]);
        let settings = EncodeSettings::new(Path::new("/out/video.mp4"), 24);

        let cmd = FfmpegCommand::new(&timeline, &settings, CANVAS)
            .build_command(Path::new("/tmp/filter.txt"));
        let args = args_of(&cmd);

        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"[aout]".to_string()));
        assert!(!args.contains(&"-c:a".to_string()));
    }
}
