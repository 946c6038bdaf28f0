// tests/extraction_pipeline_test.rs

use me_dl::{
    client::ApiClient,
    config::AppConfig,
    error::{AppError, AppResult},
    extractor::ExtractionOrchestrator,
};
use mockito::{Matcher, Server};
use std::{fs, sync::Arc};
use tempfile::tempdir;

fn client_for(server_url: &str) -> Arc<ApiClient> {
    let mut config = AppConfig::default();
    config.api_base_url = server_url.to_string();
    Arc::new(ApiClient::new(&config, "fake-token").expect("无法创建测试客户端"))
}

/// 为一个科目注册内容分页: 第 1 页返回给定响应体，其余页一律为空页
async fn mock_subject_pages(server: &mut Server, batch_id: &str, subject_id: &str, page1_body: &str) {
    // 先注册第 1 页的精确匹配，再注册空页兜底。
    // mockito 在多个 mock 命中时，优先选择第一个“仍缺命中次数”的 mock，
    // 因此更具体的第 1 页必须先注册，才能在 page=1 请求上压过通配兜底。
    server
        .mock(
            "GET",
            format!("/batches/{}/subject/{}/contents", batch_id, subject_id).as_str(),
        )
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("contentType".into(), "exercises-notes-videos".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page1_body)
        .create_async()
        .await;
    server
        .mock(
            "GET",
            format!("/batches/{}/subject/{}/contents", batch_id, subject_id).as_str(),
        )
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": []}"#)
        .expect_at_least(1)
        .create_async()
        .await;
}

async fn mock_batch_details(server: &mut Server, batch_id: &str, body: &str) {
    server
        .mock("GET", format!("/batches/{}/details", batch_id).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
}

#[tokio::test]
async fn test_two_subjects_yield_four_records_plus_footer() -> AppResult<()> {
    let mut server = Server::new_async().await;

    mock_batch_details(
        &mut server,
        "b1",
        r#"{"data": {"subjects": [
            {"_id": "s1", "subject": "Mathematics"},
            {"_id": "s2", "subject": "Physics"}
        ]}}"#,
    )
    .await;

    // 每个科目: 一条直链条目 + 一条只带作业附件的条目
    for (sid, lecture, sheet) in [("s1", "math-l1", "math-dpp1"), ("s2", "phy-l1", "phy-dpp1")] {
        let body = format!(
            r#"{{"data": [
                {{"topic": "Lecture {sid}", "url": "https://files.example.com/{lecture}.mp4", "lectureType": "video"}},
                {{"topic": "DPP {sid}", "url": "", "homeworkIds": [{{
                    "attachmentIds": [{{"name": "Sheet {sid}", "baseUrl": "https://cdn.example.com/", "key": "{sheet}.pdf"}}]
                }}]}}
            ]}}"#
        );
        mock_subject_pages(&mut server, "b1", sid, &body).await;
    }

    let dir = tempdir()?;
    let output_path = dir.path().join("links.txt");
    let report = ExtractionOrchestrator::new(client_for(&server.url()))
        .run("b1", &output_path)
        .await?;

    assert_eq!(report.record_count, 4);
    assert_eq!(report.subject_count, 2);
    assert_eq!(report.failed_subjects, 0);
    assert_eq!(report.skipped_items, 0);

    let content = fs::read_to_string(&output_path)?;
    let record_lines: Vec<&str> = content.lines().take_while(|l| !l.is_empty()).collect();
    assert_eq!(record_lines.len(), 4, "应有 4 行记录: {content}");
    // 记录顺序不承诺稳定，只验证集合内容
    assert!(content.contains("[video] Lecture s1:https://files.example.com/math-l1.mp4"));
    assert!(content.contains("[notes] Sheet s1:https://cdn.example.com/math-dpp1.pdf"));
    assert!(content.contains("[video] Lecture s2:https://files.example.com/phy-l1.mp4"));
    assert!(content.contains("[notes] Sheet s2:https://cdn.example.com/phy-dpp1.pdf"));
    assert!(content.ends_with("\n━━━━━━━━━━━━━━━\nExtracted via MadeEasy Extractor\n━━━━━━━━━━━━━━━\n"));
    Ok(())
}

#[tokio::test]
async fn test_stream_manifest_url_resolved_end_to_end() -> AppResult<()> {
    let mut server = Server::new_async().await;

    mock_batch_details(
        &mut server,
        "b2",
        r#"{"data": {"subjects": [{"_id": "s1", "subject": "Chemistry"}]}}"#,
    )
    .await;
    mock_subject_pages(
        &mut server,
        "b2",
        "s1",
        r#"{"data": [{
            "topic": "Organic L3",
            "url": "https://stream.example.com/v/index.mpd?parentId=p3&childId=c3&sig=zz",
            "videoDetails": {"findKey": "fk-3"}
        }]}"#,
    )
    .await;

    let dir = tempdir()?;
    let output_path = dir.path().join("links.txt");
    ExtractionOrchestrator::new(client_for(&server.url()))
        .run("b2", &output_path)
        .await?;

    let content = fs::read_to_string(&output_path)?;
    // parentId= 之前的部分作为资源地址，播放参数重新拼接在行尾
    assert!(content.contains(
        "[video] Organic L3:https://stream.example.com/v/index.mpd?&parentId=p3&childId=c3"
    ));
    Ok(())
}

#[tokio::test]
async fn test_empty_attachment_key_skipped_but_primary_kept() -> AppResult<()> {
    let mut server = Server::new_async().await;

    mock_batch_details(
        &mut server,
        "b3",
        r#"{"data": {"subjects": [{"_id": "s1", "subject": "Biology"}]}}"#,
    )
    .await;
    mock_subject_pages(
        &mut server,
        "b3",
        "s1",
        r#"{"data": [{
            "topic": "Cell Division",
            "url": "https://files.example.com/cell.mp4",
            "homeworkIds": [{"attachmentIds": [
                {"name": "Empty Key", "baseUrl": "https://cdn.example.com/", "key": ""}
            ]}]
        }]}"#,
    )
    .await;

    let dir = tempdir()?;
    let output_path = dir.path().join("links.txt");
    let report = ExtractionOrchestrator::new(client_for(&server.url()))
        .run("b3", &output_path)
        .await?;

    // 空 key 附件不产生记录，也不算异常；主链接记录保留
    assert_eq!(report.record_count, 1);
    assert_eq!(report.skipped_items, 0);
    let content = fs::read_to_string(&output_path)?;
    assert!(content.contains("[video] Cell Division:https://files.example.com/cell.mp4"));
    assert!(!content.contains("Empty Key"));
    Ok(())
}

#[tokio::test]
async fn test_fatal_details_failure_writes_no_manifest() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/batches/b4/details")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let output_path = dir.path().join("links.txt");
    let result = ExtractionOrchestrator::new(client_for(&server.url()))
        .run("b4", &output_path)
        .await;

    assert!(matches!(result, Err(AppError::Network(_))));
    assert!(!output_path.exists(), "致命失败后不应留下任何清单文件");
}

#[tokio::test]
async fn test_non_json_details_reports_parse_error_with_url() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/batches/b5/details")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let output_path = dir.path().join("links.txt");
    let result = ExtractionOrchestrator::new(client_for(&server.url()))
        .run("b5", &output_path)
        .await;

    match result {
        Err(AppError::ApiParseFailed { url, .. }) => assert!(url.contains("/batches/b5/details")),
        other => panic!("期望 ApiParseFailed，实际为 {:?}", other.map(|r| r.record_count)),
    }
    assert!(!output_path.exists());
}

#[tokio::test]
async fn test_one_failing_subject_does_not_lose_the_batch() -> AppResult<()> {
    let mut server = Server::new_async().await;

    mock_batch_details(
        &mut server,
        "b6",
        r#"{"data": {"subjects": [
            {"_id": "good", "subject": "Good"},
            {"_id": "bad", "subject": "Bad"}
        ]}}"#,
    )
    .await;
    mock_subject_pages(
        &mut server,
        "b6",
        "good",
        r#"{"data": [{"topic": "Kept", "url": "https://files.example.com/kept.mp4"}]}"#,
    )
    .await;
    // bad 科目的所有分页都返回 500
    server
        .mock("GET", "/batches/b6/subject/bad/contents")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect_at_least(1)
        .create_async()
        .await;

    let dir = tempdir()?;
    let output_path = dir.path().join("links.txt");
    let report = ExtractionOrchestrator::new(client_for(&server.url()))
        .run("b6", &output_path)
        .await?;

    assert_eq!(report.record_count, 1);
    assert_eq!(report.failed_subjects, 1);
    let content = fs::read_to_string(&output_path)?;
    assert!(content.contains("[video] Kept:https://files.example.com/kept.mp4"));
    Ok(())
}
