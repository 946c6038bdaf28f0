// src/models/api.rs

use serde::Deserialize;

// 上游接口字段均为抓包推断，所有字段缺失时都退化为默认值，
// 未知字段一律忽略。

// --- 批次列表 (my-batches) 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct MyBatchesResponse {
    #[serde(default)]
    pub data: Vec<BatchSummary>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BatchSummary {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
}

// --- 批次详情 (details) 响应结构体 ---

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BatchDetailsResponse {
    #[serde(default)]
    pub data: BatchDetails,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BatchDetails {
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Subject {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: String,
}

// --- 科目内容分页 (contents) 响应结构体 ---

// data 数组先保留为原始 JSON 值，逐条转换为 ContentItem，
// 单条畸形数据只丢弃该条，不影响整页
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ContentsResponse {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ContentItem {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "lectureType")]
    pub lecture_type: Option<String>,
    #[serde(default, rename = "videoDetails")]
    pub video_details: Option<VideoDetails>,
    #[serde(default, rename = "homeworkIds")]
    pub homework_ids: Vec<Homework>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VideoDetails {
    #[serde(default, rename = "findKey")]
    pub find_key: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Homework {
    #[serde(default, rename = "attachmentIds")]
    pub attachment_ids: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Attachment {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "baseUrl")]
    pub base_url: String,
    #[serde(default)]
    pub key: String,
}
