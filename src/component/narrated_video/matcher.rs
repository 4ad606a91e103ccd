//! 投影片與旁白配對
//!
//! 旁白檔名主幹包含投影片檔名主幹，或包含投影片的序號（從 1 開始）即視為配對。
//! 已配對的旁白不會被移除，檔名模糊時同一個旁白可能配給多張投影片。

use super::{NarrationAsset, SlideAsset};

/// 一張投影片與其旁白（可能沒有）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideMatch<'a> {
    pub slide: &'a SlideAsset,
    pub narration: Option<&'a NarrationAsset>,
}

/// 依序為每張投影片尋找第一個符合的旁白
#[must_use]
pub fn match_narrations<'a>(
    slides: &'a [SlideAsset],
    narrations: &'a [NarrationAsset],
) -> Vec<SlideMatch<'a>> {
    slides
        .iter()
        .enumerate()
        .map(|(index, slide)| SlideMatch {
            slide,
            narration: find_narration(&slide.stem(), index + 1, narrations),
        })
        .collect()
}

/// `display_index` 為從 1 開始的投影片序號
#[must_use]
pub fn find_narration<'a>(
    slide_stem: &str,
    display_index: usize,
    narrations: &'a [NarrationAsset],
) -> Option<&'a NarrationAsset> {
    let index_text = display_index.to_string();
    narrations.iter().find(|narration| {
        let stem = narration.stem();
        stem.contains(slide_stem) || stem.contains(&index_text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{OrderedFile, SlideKey};
    use std::path::PathBuf;

    fn assets(names: &[&str]) -> Vec<OrderedFile> {
        names
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let path = PathBuf::from(name);
                let stem = path.file_stem().unwrap().to_string_lossy().to_string();
                OrderedFile {
                    position,
                    key: SlideKey::from_stem(&stem),
                    path,
                }
            })
            .collect()
    }

    fn matched_names(matches: &[SlideMatch<'_>]) -> Vec<Option<String>> {
        matches
            .iter()
            .map(|m| m.narration.map(OrderedFile::file_name))
            .collect()
    }

    #[test]
    fn test_only_matching_slide_gets_narration() {
        let slides = assets(&["slide1.png", "slide2.png", "slide3.png"]);
        let narrations = assets(&["narration_slide2.mp3"]);

        let matches = match_narrations(&slides, &narrations);

        assert_eq!(
            matched_names(&matches),
            [None, Some("narration_slide2.mp3".to_string()), None]
        );
    }

    #[test]
    fn test_position_substring_rule() {
        let slides = assets(&["intro.png"]);
        let narrations = assets(&["01_track.mp3"]);

        let matches = match_narrations(&slides, &narrations);

        assert_eq!(matched_names(&matches), [Some("01_track.mp3".to_string())]);
    }

    #[test]
    fn test_first_narration_in_order_wins() {
        let slides = assets(&["slide1.png"]);
        let narrations = assets(&["a_slide1.mp3", "b_slide1.mp3"]);

        let matches = match_narrations(&slides, &narrations);

        assert_eq!(matched_names(&matches), [Some("a_slide1.mp3".to_string())]);
    }

    #[test]
    fn test_narration_can_be_reused() {
        // "slide12" 同時包含 "1" 與 "2"
        let slides = assets(&["a.png", "b.png"]);
        let narrations = assets(&["slide12.mp3"]);

        let matches = match_narrations(&slides, &narrations);

        assert_eq!(
            matched_names(&matches),
            [
                Some("slide12.mp3".to_string()),
                Some("slide12.mp3".to_string())
            ]
        );
    }

    #[test]
    fn test_no_narrations() {
        let slides = assets(&["slide1.png", "slide2.png"]);
        let matches = match_narrations(&slides, &[]);

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.narration.is_none()));
        assert_eq!(matches[1].slide.file_name(), "slide2.png");
    }

    #[test]
    fn test_slide_stem_substring_rule() {
        let slides = assets(&["chapter_a.png", "chapter_b.png"]);
        let narrations = assets(&["voice_chapter_b.mp3"]);

        let matches = match_narrations(&slides, &narrations);

        assert_eq!(
            matched_names(&matches),
            [None, Some("voice_chapter_b.mp3".to_string())]
        );
    }
}
