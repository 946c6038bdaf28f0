// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

// 辅助函数，避免重复
fn main_command() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// --- 测试基本 CLI 行为 ---

#[test]
fn test_help_flag() {
    let mut cmd = main_command();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("显示此帮助信息并退出"));
}

#[test]
fn test_token_help_command() {
    let mut cmd = main_command();
    cmd.arg("--token-help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("获取 Access Token 指南"))
        .stdout(predicate::str::contains("Authorization: Bearer"));
}

#[test]
fn test_missing_mode_shows_help() {
    let mut cmd = main_command();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_conflicting_modes_rejected() {
    let mut cmd = main_command();
    cmd.args(["--interactive", "--batch-id", "b1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_batch_mode_without_token_fails() {
    // 用临时 HOME 隔离本地配置文件，确保没有残留 Token 可用
    let home = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.env("HOME", home.path())
        .env_remove("ACCESS_TOKEN")
        .args(["--batch-id", "b1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("未提供 Access Token"));
}

#[test]
fn test_subtitle_mode_rejects_invalid_url() {
    let home = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.env("HOME", home.path())
        .env_remove("ACCESS_TOKEN")
        .args(["--subtitle-url", "not a url"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("不是有效的链接"));
}

#[test]
fn test_subtitle_mode_decodes_webvtt_to_stdout() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/captions/intro.vtt")
        .with_status(200)
        .with_header("content-type", "text/vtt")
        .with_body("WEBVTT\n\n1\n00:00:01.000 --> 00:00:02.000\nWelcome to the course\n")
        .create();

    let home = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.env("HOME", home.path())
        .env_remove("ACCESS_TOKEN")
        .args(["--subtitle-url", &format!("{}/captions/intro.vtt", server.url())]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Welcome to the course"))
        .stdout(predicate::str::contains("-->").not());
}
