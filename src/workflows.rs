// src/workflows.rs

use crate::{
    ExtractionJobContext, config, constants,
    error::{AppError, AppResult},
    extractor::{ExtractionOrchestrator, subtitle},
    models::{ExtractionReport, api::MyBatchesResponse},
    symbols, ui, utils,
};
use colored::*;
use log::info;
use std::path::PathBuf;
use url::Url;

/// 运行交互模式: 就地解析或询问 Token，列出账号批次供选择后提取
pub(crate) async fn run_interactive(context: ExtractionJobContext) -> AppResult<()> {
    ui::print_header("交互模式");

    let token = match &context.token {
        Some(token) => token.clone(),
        None => prompt_and_maybe_save_token()?,
    };
    let http_client = context.build_client(&token)?;

    let response: MyBatchesResponse = http_client.get_json("/batches/my-batches?page=1").await?;
    let batches: Vec<(String, String)> = response
        .data
        .into_iter()
        .filter_map(|b| {
            let id = b.id?;
            Some((id, b.name.unwrap_or_else(|| "未命名批次".to_string())))
        })
        .collect();
    if batches.is_empty() {
        return Err(AppError::UserInputError(
            "该账号下没有任何批次，请检查 Token 是否正确。".to_string(),
        ));
    }
    info!("账号下共 {} 个批次", batches.len());

    let options: Vec<String> = batches
        .iter()
        .map(|(id, name)| {
            format!(
                "{} ({})",
                utils::truncate_text(name, constants::MENU_TEXT_TRUNCATE_LENGTH),
                id
            )
        })
        .collect();
    let choice = ui::selection_menu(
        &options,
        "账号下的批次",
        "请输入数字选择要提取的批次 (直接回车取消)",
        "",
    );
    let choice = choice.trim().to_string();
    if choice.is_empty() {
        ui::info("已取消。");
        return Ok(());
    }
    let index = choice
        .parse::<usize>()
        .ok()
        .filter(|i| (1..=batches.len()).contains(i))
        .ok_or_else(|| AppError::UserInputError(format!("无效的选择 '{}'。", choice)))?
        - 1;
    let (batch_id, batch_name) = &batches[index];

    let output_path = context
        .args
        .output
        .clone()
        .unwrap_or_else(|| default_output_for(batch_name));
    ui::plain("");
    ui::info(&format!("开始提取批次 '{}'，请稍候...", batch_name));

    let report = ExtractionOrchestrator::new(http_client)
        .run(batch_id, &output_path)
        .await?;
    print_report(&report);
    Ok(())
}

/// 运行直接模式 (--batch-id)
pub(crate) async fn run_batch(batch_id: &str, context: ExtractionJobContext) -> AppResult<()> {
    let token = context.token.clone().ok_or(AppError::TokenMissing)?;
    let http_client = context.build_client(&token)?;

    let output_path = context
        .args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_FILE));

    let report = ExtractionOrchestrator::new(http_client)
        .run(batch_id, &output_path)
        .await?;
    print_report(&report);
    Ok(())
}

/// 运行字幕模式 (--subtitle-url): 下载并解码单个字幕，纯文本打到标准输出。
/// 下载/解码失败是软失败，只提示不报错
pub(crate) async fn run_subtitle(subtitle_url: &str, context: ExtractionJobContext) -> AppResult<()> {
    Url::parse(subtitle_url)
        .map_err(|_| AppError::UserInputError(format!("'{}' 不是有效的链接。", subtitle_url)))?;

    // 字幕多在公开 CDN 上，没有 Token 也尝试匿名下载
    let http_client = context.build_client(context.token.as_deref().unwrap_or_default())?;
    match subtitle::fetch_plain_text(&http_client, subtitle_url).await {
        Some(text) => {
            println!("{}", text);
            Ok(())
        }
        None => {
            eprintln!("{} 未能生成字幕文本。", *symbols::WARN);
            Ok(())
        }
    }
}

// --- 模块内部辅助函数 ---

fn prompt_and_maybe_save_token() -> AppResult<String> {
    ui::plain(&format!(
        "未找到本地 Access Token。请粘贴 MadeEasy Bearer Token (输入不回显，按 {} 退出)。",
        *symbols::CTRL_C
    ));
    ui::plain("切勿向任何人分享账号密码或验证码，Token 亦请妥善保管。");
    let token = ui::prompt_hidden("Access Token")
        .map_err(|_| AppError::UserInterrupt)?
        .trim()
        .to_string();
    if token.is_empty() {
        return Err(AppError::UserInputError("未提供 Token。".to_string()));
    }
    if ui::confirm("是否将 Token 保存到本地配置文件?", false) {
        config::token::save_token(&token)?;
    }
    Ok(token)
}

fn default_output_for(batch_name: &str) -> PathBuf {
    let stem = utils::sanitize_text(batch_name);
    if stem.trim().is_empty() {
        PathBuf::from(constants::DEFAULT_OUTPUT_FILE)
    } else {
        PathBuf::from(format!("{}.txt", stem))
    }
}

fn print_report(report: &ExtractionReport) {
    ui::print_header("提取报告");
    println!(
        "{} 共提取 {} 条记录 (科目 {} 个，开始于 {})",
        *symbols::OK,
        report.record_count,
        report.subject_count,
        report.started_at.format("%d-%m-%Y %I:%M %p")
    );
    if report.skipped_items > 0 {
        println!(
            "{} 有 {} 个条目/附件无法解析，已跳过",
            *symbols::WARN,
            report.skipped_items
        );
    }
    if report.failed_subjects > 0 {
        println!(
            "{} {} 个科目抓取失败，清单可能不完整",
            *symbols::WARN,
            report.failed_subjects
        );
    }
    println!(
        "{} 清单已保存至: {}",
        *symbols::INFO,
        report.output_path.display().to_string().green()
    );
}
