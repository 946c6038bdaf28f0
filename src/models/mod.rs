// src/models/mod.rs

pub mod api;

use chrono::{DateTime, Local};
use std::path::PathBuf;

/// 清单中的一行: 一条已清洗命名的内容链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    pub name: String,
    pub url: String,
    pub content_type: String,
    pub parent_id: Option<String>,
    pub child_id: Option<String>,
}

impl ExtractionRecord {
    /// 序列化为 `[type] name:url` 行；只有 parent/child 同时存在时
    /// 才追加 `&parentId=P&childId=C` 播放参数
    pub fn format_line(&self) -> String {
        let prefix = if self.content_type.is_empty() {
            String::new()
        } else {
            format!("[{}] ", self.content_type)
        };
        match (&self.parent_id, &self.child_id) {
            (Some(parent), Some(child)) => format!(
                "{}{}:{}&parentId={}&childId={}",
                prefix, self.name, self.url, parent, child
            ),
            _ => format!("{}{}:{}", prefix, self.name, self.url),
        }
    }
}

/// 单个科目抓取任务的产出，由编排器在所有任务完成后合并
#[derive(Debug, Default)]
pub struct SubjectExtraction {
    pub records: Vec<ExtractionRecord>,
    /// 无法解析而被跳过的条目/附件数
    pub skipped: usize,
}

/// 一次完整提取的汇总结果
#[derive(Debug)]
pub struct ExtractionReport {
    pub record_count: usize,
    pub skipped_items: usize,
    pub subject_count: usize,
    pub failed_subjects: usize,
    pub output_path: PathBuf,
    pub started_at: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(parent: Option<&str>, child: Option<&str>) -> ExtractionRecord {
        ExtractionRecord {
            name: "Intro".to_string(),
            url: "https://cdn.example.com/a.mp4".to_string(),
            content_type: "video".to_string(),
            parent_id: parent.map(String::from),
            child_id: child.map(String::from),
        }
    }

    #[test]
    fn test_format_line_without_stream_ids() {
        assert_eq!(
            record(None, None).format_line(),
            "[video] Intro:https://cdn.example.com/a.mp4"
        );
    }

    #[test]
    fn test_format_line_with_stream_ids() {
        assert_eq!(
            record(Some("b1"), Some("c1")).format_line(),
            "[video] Intro:https://cdn.example.com/a.mp4&parentId=b1&childId=c1"
        );
    }

    #[test]
    fn test_format_line_requires_both_ids() {
        // 只有一半播放参数时退回普通直链格式
        assert_eq!(
            record(Some("b1"), None).format_line(),
            "[video] Intro:https://cdn.example.com/a.mp4"
        );
    }

    #[test]
    fn test_format_line_empty_type_has_no_prefix() {
        let mut r = record(None, None);
        r.content_type = String::new();
        assert_eq!(r.format_line(), "Intro:https://cdn.example.com/a.mp4");
    }
}
