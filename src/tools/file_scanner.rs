use anyhow::Result;
use log::warn;
use regex::Regex;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static REGEX_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex"));

/// 由檔名主幹取出的排序鍵
///
/// 主幹含數字時取最長的連續數字段（長度相同取第一段）並以數值比較，
/// 否則以原始主幹做字典序比較。數值鍵一律排在文字鍵之前。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideKey {
    /// 去除前導零後的數字字串（空字串代表 0）
    Numeric(String),
    Text(String),
}

impl SlideKey {
    #[must_use]
    pub fn from_stem(stem: &str) -> Self {
        let longest = REGEX_DIGIT_RUN
            .find_iter(stem)
            .map(|m| m.as_str())
            .fold(None::<&str>, |best, run| match best {
                Some(b) if b.len() >= run.len() => Some(b),
                _ => Some(run),
            });

        match longest {
            Some(digits) => Self::Numeric(digits.trim_start_matches('0').to_string()),
            None => Self::Text(stem.to_string()),
        }
    }
}

impl Ord for SlideKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // 已去除前導零，位數較少者數值較小
            (Self::Numeric(a), Self::Numeric(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Numeric(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SlideKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 排序後的素材檔案（投影片或旁白）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedFile {
    /// 排序後的位置（從 0 開始）
    pub position: usize,
    pub key: SlideKey,
    pub path: PathBuf,
}

impl OrderedFile {
    /// 檔名主幹（不含副檔名）
    #[must_use]
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.').to_lowercase();
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.to_lowercase() == wanted)
}

/// 列出目錄第一層中指定副檔名的檔案，依 `SlideKey` 排序
///
/// 鍵值相同時保留檔名順序。沒有符合的檔案時回傳空列表。
pub fn scan_sorted_files(directory: &Path, extension: &str) -> Result<Vec<OrderedFile>> {
    let mut files: Vec<(SlideKey, PathBuf)> = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        // 無法讀取的項目（例如失效的符號連結）略過，不影響其他檔案
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("略過無法讀取的項目 ({}): {e}", directory.display());
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }

        let stem = entry
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        files.push((SlideKey::from_stem(&stem), entry.into_path()));
    }

    // sort_by 為穩定排序
    files.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(position, (key, path))| OrderedFile {
            position,
            key,
            path,
        })
        .collect())
}

/// 依序嘗試多個副檔名，回傳第一個非空的結果
pub fn scan_first_nonempty(directory: &Path, extensions: &[&str]) -> Result<Vec<OrderedFile>> {
    for extension in extensions {
        let files = scan_sorted_files(directory, extension)?;
        if !files.is_empty() {
            return Ok(files);
        }
    }
    Ok(Vec::new())
}
