// src/extractor/content.rs

use super::stream;
use crate::{
    client::ApiClient,
    constants::api,
    error::*,
    models::{
        ExtractionRecord, SubjectExtraction,
        api::{Attachment, ContentItem, ContentsResponse},
    },
    utils,
};
use futures::{StreamExt, stream as futures_stream};
use log::{debug, trace};
use std::sync::Arc;

pub struct ContentFetcher {
    http_client: Arc<ApiClient>,
}

impl ContentFetcher {
    pub fn new(http_client: Arc<ApiClient>) -> Self {
        Self { http_client }
    }

    /// 并发抓取一个科目的全部内容分页，并归一化为清单记录。
    ///
    /// 分页请求在固定并发窗口内推进，消费到第一处空页即停止，
    /// 12 页的上限仍然保留，超出真实页数的请求只会得到无害的空页。
    /// 页内条目按响应顺序处理，单条畸形数据只丢弃该条并计入 skipped。
    pub async fn fetch_subject_records(
        &self,
        batch_id: &str,
        subject_id: &str,
    ) -> AppResult<SubjectExtraction> {
        let pages = futures_stream::iter(1..=api::MAX_CONTENT_PAGES)
            .map(|page| {
                let client = self.http_client.clone();
                let path = format!(
                    "/batches/{}/subject/{}/contents?page={}&contentType={}",
                    batch_id, subject_id, page, api::CONTENT_TYPE_FILTER
                );
                async move { client.get_json::<ContentsResponse>(&path).await }
            })
            .buffered(api::PAGE_FETCH_CONCURRENCY);
        futures::pin_mut!(pages);

        let mut extraction = SubjectExtraction::default();
        let mut pages_consumed = 0u32;
        while let Some(page_result) = pages.next().await {
            let page = page_result?;
            if page.data.is_empty() {
                break;
            }
            pages_consumed += 1;
            for value in page.data {
                self.process_item(value, batch_id, &mut extraction);
            }
        }
        debug!(
            "科目 '{}': {} 页有效内容，{} 条记录，跳过 {} 条",
            subject_id,
            pages_consumed,
            extraction.records.len(),
            extraction.skipped
        );
        Ok(extraction)
    }

    /// 单个条目的归一化: 至多一条主链接记录，加上每个有 key 的作业附件各一条。
    /// 主链接为流媒体清单时经分类器解析出播放参数，其余按直链保留
    fn process_item(
        &self,
        value: serde_json::Value,
        batch_id: &str,
        out: &mut SubjectExtraction,
    ) {
        let item: ContentItem = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(e) => {
                trace!("跳过无法解析的内容条目: {}", e);
                out.skipped += 1;
                return;
            }
        };

        let content_id = item
            .video_details
            .as_ref()
            .and_then(|v| v.find_key.as_deref());
        let content_type = item
            .lecture_type
            .as_deref()
            .unwrap_or(api::content_types::DEFAULT)
            .to_lowercase();
        let topic = utils::sanitize_text(&item.topic);

        // 没有主链接的条目不算异常，可能只携带作业附件
        if !item.url.is_empty() {
            let record = if stream::is_stream_manifest(&item.url) {
                let link = stream::resolve_stream_link(&item.url, content_id, batch_id);
                ExtractionRecord {
                    name: topic,
                    url: link.url,
                    content_type,
                    parent_id: link.parent_id,
                    child_id: link.child_id,
                }
            } else {
                ExtractionRecord {
                    name: topic,
                    url: item.url.clone(),
                    content_type,
                    parent_id: None,
                    child_id: None,
                }
            };
            out.records.push(record);
        }

        for homework in &item.homework_ids {
            for value in &homework.attachment_ids {
                match serde_json::from_value::<Attachment>(value.clone()) {
                    // key 为空的附件没有可解析的下载地址，静默跳过
                    Ok(attachment) if attachment.key.is_empty() => {}
                    Ok(attachment) => out.records.push(ExtractionRecord {
                        name: utils::sanitize_text(&attachment.name),
                        url: format!("{}{}", attachment.base_url, attachment.key),
                        content_type: api::content_types::NOTES.to_string(),
                        parent_id: None,
                        child_id: None,
                    }),
                    Err(e) => {
                        trace!("跳过无法解析的附件: {}", e);
                        out.skipped += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use serde_json::json;

    fn fetcher() -> ContentFetcher {
        let config = AppConfig::default();
        ContentFetcher::new(Arc::new(ApiClient::new(&config, "test-token").unwrap()))
    }

    #[test]
    fn test_item_with_direct_url_yields_one_tagged_record() {
        let mut out = SubjectExtraction::default();
        let item = json!({
            "topic": "Intro: Part 1",
            "url": "https://files.example.com/intro.mp4",
            "lectureType": "Video"
        });
        fetcher().process_item(item, "batch-1", &mut out);

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].content_type, "video");
        // 主题中的保留字符已被清洗
        assert_eq!(out.records[0].name, "Intro_ Part 1");
        assert_eq!(out.records[0].parent_id, None);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn test_stream_manifest_url_goes_through_classifier() {
        let mut out = SubjectExtraction::default();
        let item = json!({
            "topic": "Lecture 2",
            "url": "https://stream.example.com/v/index.mpd?parentId=p9&childId=c9",
            "videoDetails": { "findKey": "fk-2" }
        });
        fetcher().process_item(item, "batch-1", &mut out);

        assert_eq!(out.records.len(), 1);
        let record = &out.records[0];
        assert_eq!(record.url, "https://stream.example.com/v/index.mpd?");
        assert_eq!(record.parent_id.as_deref(), Some("p9"));
        assert_eq!(record.child_id.as_deref(), Some("c9"));
        // lectureType 缺失时默认按 video 归类
        assert_eq!(record.content_type, "video");
    }

    #[test]
    fn test_attachment_with_key_yields_notes_record() {
        let mut out = SubjectExtraction::default();
        let item = json!({
            "topic": "DPP 5",
            "url": "",
            "homeworkIds": [{
                "attachmentIds": [
                    { "name": "Sheet 5", "baseUrl": "https://cdn.example.com/", "key": "sheet5.pdf" },
                    { "name": "Broken", "baseUrl": "https://cdn.example.com/", "key": "" }
                ]
            }]
        });
        fetcher().process_item(item, "batch-1", &mut out);

        // 空 key 的附件被静默跳过，主链接为空也不产生记录
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].content_type, "notes");
        assert_eq!(out.records[0].url, "https://cdn.example.com/sheet5.pdf");
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn test_malformed_entries_are_counted_not_fatal() {
        let mut out = SubjectExtraction::default();
        // 整条畸形数据
        fetcher().process_item(json!("not an object"), "batch-1", &mut out);
        // 附件畸形但条目本身有效
        let item = json!({
            "topic": "Mixed",
            "url": "https://files.example.com/a.mp4",
            "homeworkIds": [{ "attachmentIds": [ "bogus" ] }]
        });
        fetcher().process_item(item, "batch-1", &mut out);

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 2);
    }
}
