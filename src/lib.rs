// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod manifest;
pub mod models;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::Cli,
    client::ApiClient,
    config::AppConfig,
    error::AppResult,
};
use colored::*;
use log::{debug, info};
use std::sync::Arc;

/// 一次运行的执行上下文: 已解析的 Token、应用配置与命令行参数
#[derive(Clone)]
pub struct ExtractionJobContext {
    pub token: Option<String>,
    pub config: Arc<AppConfig>,
    pub args: Arc<Cli>,
}

impl ExtractionJobContext {
    /// Token 就绪后构建共享的 API 客户端，供所有并发任务复用
    pub fn build_client(&self, token: &str) -> AppResult<Arc<ApiClient>> {
        Ok(Arc::new(ApiClient::new(&self.config, token)?))
    }
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    if args.token_help {
        ui::box_message(
            "获取 Access Token 指南",
            constants::HELP_TOKEN_GUIDE
                .lines()
                .collect::<Vec<_>>()
                .as_slice(),
            |s| s.cyan(),
        );
        println!(
            "\n{} 安全提醒: 请妥善保管你的 Token，不要分享给他人。",
            *symbols::INFO
        );
        return Ok(());
    }

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let (token_opt, source) = config::token::resolve_token(args.token.as_deref());

    // 字幕模式把纯文本打到标准输出，保持 stdout 干净以便管道使用，
    // 不掺杂 Token 来源提示
    if let Some(subtitle_url) = &args.subtitle_url {
        let context = ExtractionJobContext {
            token: token_opt,
            config,
            args: args.clone(),
        };
        return workflows::run_subtitle(subtitle_url, context).await;
    }

    if token_opt.is_some() {
        info!("从 {} 加载 Access Token", source);
        println!("\n{} 已从 {} 加载 Access Token。", *symbols::INFO, source);
    } else {
        info!("未找到本地 Access Token");
        println!(
            "\n{}",
            format!("{} 未找到本地 Access Token。", *symbols::INFO).yellow()
        );
    }

    let context = ExtractionJobContext {
        token: token_opt,
        config,
        args: args.clone(),
    };

    if args.interactive {
        workflows::run_interactive(context).await
    } else if let Some(batch_id) = &args.batch_id {
        workflows::run_batch(batch_id, context).await
    } else {
        // clap 的 mode group 保证四种模式必居其一
        Ok(())
    }
}
