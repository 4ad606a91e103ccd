use anyhow::{Context, Result, bail};
use log::debug;
use std::path::PathBuf;
use std::process::Command;

/// 確認外部工具存在於 PATH，回傳其路徑
pub fn require_tool(name: &str) -> Result<PathBuf> {
    let path = which::which(name).with_context(|| format!("找不到外部工具: {name}"))?;
    debug!("找到 {name}: {}", path.display());
    Ok(path)
}

/// 列出 ffmpeg 支援的編碼器名稱
pub fn list_ffmpeg_encoders() -> Result<Vec<String>> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .context("無法執行 ffmpeg -encoders")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffmpeg -encoders 執行失敗: {}", stderr.trim());
    }

    Ok(parse_encoder_list(&String::from_utf8_lossy(&output.stdout)))
}

/// 解析 `ffmpeg -encoders` 輸出
///
/// 每列格式為 ` V....D libx264   description`，旗標欄之後即為名稱。
/// 說明區塊以 ` ------` 結束。
fn parse_encoder_list(output: &str) -> Vec<String> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("------"))
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let flags = fields.next()?;
            if flags.len() != 6 {
                return None;
            }
            fields.next().map(str::to_string)
        })
        .collect()
}

/// 檢查轉檔所需的工具與編碼器是否齊全
pub fn check_media_capabilities(encoders: &[&str]) -> Result<()> {
    require_tool("ffmpeg")?;
    require_tool("ffprobe")?;

    let available = list_ffmpeg_encoders()?;
    let missing: Vec<&str> = encoders
        .iter()
        .copied()
        .filter(|encoder| !available.iter().any(|a| a == *encoder))
        .collect();

    if !missing.is_empty() {
        bail!("ffmpeg 缺少編碼器: {}", missing.join(", "));
    }
    Ok(())
}
