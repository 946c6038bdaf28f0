// src/extractor/mod.rs

pub mod content;
pub mod stream;
pub mod subtitle;

use crate::{
    client::ApiClient,
    error::*,
    manifest,
    models::{ExtractionReport, api::BatchDetailsResponse},
    ui, utils,
};
use chrono::Local;
use futures::future;
use log::{info, warn};
use std::{path::Path, sync::Arc};

pub struct ExtractionOrchestrator {
    http_client: Arc<ApiClient>,
}

impl ExtractionOrchestrator {
    pub fn new(http_client: Arc<ApiClient>) -> Self {
        Self { http_client }
    }

    /// 提取一个批次的全部科目内容并写出链接清单。
    ///
    /// 只有两处致命边界: 批次详情请求和清单写入，二者失败直接向上抛错
    /// (详情请求失败时不会留下任何输出文件)。单个科目抓取失败只降级为
    /// 警告并计入报告，保住其余科目的结果。
    /// 科目任务全量并发展开，各自返回记录序列，完成后统一合并，
    /// 清单内记录顺序不承诺稳定。
    pub async fn run(&self, batch_id: &str, output_path: &Path) -> AppResult<ExtractionReport> {
        let started_at = Local::now();
        info!(
            "开始提取批次 '{}'，时间: {}",
            batch_id,
            started_at.format("%d-%m-%Y %I:%M %p")
        );

        let details: BatchDetailsResponse = self
            .http_client
            .get_json(&format!("/batches/{}/details", batch_id))
            .await?;
        let subjects: Vec<(String, String)> = details
            .data
            .subjects
            .into_iter()
            .filter_map(|s| match s.id {
                Some(id) => Some((id, utils::sanitize_text(&s.subject))),
                None => {
                    warn!("忽略缺少 _id 的科目 '{}'", s.subject);
                    None
                }
            })
            .collect();
        let subject_count = subjects.len();
        info!("批次 '{}' 下共 {} 个科目", batch_id, subject_count);

        let fetcher = content::ContentFetcher::new(self.http_client.clone());
        let pbar = ui::new_tasks_progress_bar(subject_count as u64, "提取");
        let tasks = subjects.iter().map(|(subject_id, subject_name)| {
            let fetcher = &fetcher;
            let pbar = pbar.clone();
            async move {
                let result = fetcher.fetch_subject_records(batch_id, subject_id).await;
                pbar.inc(1);
                (subject_name.as_str(), result)
            }
        });
        let results = future::join_all(tasks).await;
        pbar.finish_and_clear();

        let mut records = Vec::new();
        let mut skipped_items = 0;
        let mut failed_subjects = 0;
        for (subject_name, result) in results {
            match result {
                Ok(mut extraction) => {
                    records.append(&mut extraction.records);
                    skipped_items += extraction.skipped;
                }
                Err(e) => {
                    failed_subjects += 1;
                    warn!("科目 '{}' 内容抓取失败: {}", subject_name, e);
                }
            }
        }

        let output_path = manifest::write_manifest(&records, output_path)?;
        info!(
            "批次 '{}' 提取完成: {} 条记录，跳过 {} 条，失败科目 {} 个",
            batch_id,
            records.len(),
            skipped_items,
            failed_subjects
        );

        Ok(ExtractionReport {
            record_count: records.len(),
            skipped_items,
            subject_count,
            failed_subjects,
            output_path,
            started_at,
        })
    }
}
