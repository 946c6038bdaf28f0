// src/extractor/subtitle.rs

use crate::client::ApiClient;
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

// WEBVTT 的时间戳用点分隔毫秒，SRT 用逗号
static VTT_TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3}").unwrap());
static SRT_TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}:\d{2}:\d{2},\d{3}\s*-->").unwrap());
static NUMERIC_CUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    WebVtt,
    Srt,
    Plain,
}

/// 根据扩展名提示或内容特征判断字幕格式，两者都不匹配时视为纯文本
pub fn detect_format(raw: &str, hint: Option<&str>) -> SubtitleFormat {
    if let Some(hint) = hint {
        let hint = hint.to_ascii_lowercase();
        if hint.contains(".vtt") {
            return SubtitleFormat::WebVtt;
        }
        if hint.contains(".srt") {
            return SubtitleFormat::Srt;
        }
    }
    if raw.trim_start().starts_with("WEBVTT") {
        SubtitleFormat::WebVtt
    } else if SRT_TIMESTAMP_RE.is_match(raw) {
        SubtitleFormat::Srt
    } else {
        SubtitleFormat::Plain
    }
}

/// 把时间轴字幕转换为纯文本。
/// 丢弃头部、时间戳行和纯数字的 cue 序号，其余行去除首尾空白后按行拼接；
/// 无法识别的输入视为已经是纯文本，原样返回
pub fn to_plain_text(raw: &str, hint: Option<&str>) -> String {
    match detect_format(raw, hint) {
        SubtitleFormat::WebVtt => decode_webvtt(raw),
        SubtitleFormat::Srt => decode_srt(raw),
        SubtitleFormat::Plain => raw.to_string(),
    }
}

/// 下载字幕并转为纯文本。
/// 下载失败或状态码异常只产生 None (软失败)，绝不向上抛错
pub async fn fetch_plain_text(client: &ApiClient, url: &str) -> Option<String> {
    let response = match client.get(url).await {
        Ok(response) => response,
        Err(e) => {
            warn!("字幕下载失败 '{}': {}", url, e);
            return None;
        }
    };
    let raw = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!("字幕响应读取失败 '{}': {}", url, e);
            return None;
        }
    };
    Some(to_plain_text(&raw, Some(url)))
}

fn decode_webvtt(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with("WEBVTT")
                && !line.contains("-->")
                && !VTT_TIMESTAMP_RE.is_match(line)
                && !NUMERIC_CUE_RE.is_match(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_srt(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty() && !NUMERIC_CUE_RE.is_match(line) && !SRT_TIMESTAMP_RE.is_match(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
