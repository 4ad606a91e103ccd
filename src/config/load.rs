use crate::config::types::{Settings, SettingsOverride};
use anyhow::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::Path;

impl Settings {
    /// 讀取 JSON 設定檔並覆寫對應欄位
    pub fn apply_config_file(&mut self, path: &Path) -> Result<()> {
        let overrides = load_overrides(path)?;
        self.apply(overrides);
        info!("已載入設定檔: {}", path.display());
        Ok(())
    }

    pub fn apply(&mut self, overrides: SettingsOverride) {
        if let Some(v) = overrides.slides_dir {
            self.slides_dir = v;
        }
        if let Some(v) = overrides.narration_dir {
            self.narration_dir = v;
        }
        if let Some(v) = overrides.output_path {
            self.output_path = v;
        }
        if let Some(v) = overrides.slide_duration {
            self.slide_duration = v;
        }
        if let Some(v) = overrides.fps {
            self.fps = v;
        }
        if let Some(v) = overrides.audio_format {
            self.audio_format = v;
        }
    }

    /// 檢查數值並正規化旁白副檔名
    pub fn validate(&mut self) -> Result<()> {
        if !self.slide_duration.is_finite() || self.slide_duration <= 0.0 {
            bail!("投影片長度必須為正數: {}", self.slide_duration);
        }
        if self.fps == 0 {
            bail!("幀率必須大於 0");
        }

        let format = self.audio_format.trim().trim_start_matches('.').to_string();
        if format.is_empty() {
            bail!("旁白音訊格式不可為空");
        }
        self.audio_format = format;

        if self.output_path.as_os_str().is_empty() {
            bail!("輸出路徑不可為空");
        }
        Ok(())
    }
}

pub fn load_overrides(path: &Path) -> Result<SettingsOverride> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("無法讀取設定檔: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("無法解析設定檔: {}", path.display()))
}
