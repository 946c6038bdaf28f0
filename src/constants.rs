// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const MENU_TEXT_TRUNCATE_LENGTH: usize = 60;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const DEFAULT_OUTPUT_FILE: &str = "madeeasy_links.txt";
pub const USER_AGENT: &str = "MadeEasy/1.0";
pub const TOKEN_ENV_VAR: &str = "ACCESS_TOKEN";

pub const HELP_TOKEN_GUIDE: &str = r#"
1. 登录平台: 使用 Chrome / Edge / Firefox 浏览器登录 MadeEasy 网页版。
2. 打开开发者工具:
   - 在 Windows / Linux 上: 按 F12 或 Ctrl+Shift+I
   - 在 macOS 上: 按 Cmd+Opt+I (⌘⌥I)
3. 切换到“网络” (Network) 标签页，然后刷新页面。
4. 任选一个发往 api.madeeasy.in 的请求，在请求头 (Request Headers) 中找到:
----------------------------------------------
Authorization: Bearer eyJhbGciOi...
----------------------------------------------
5. 复制 "Bearer " 之后的整段字符串，即为 Access Token。"#;

pub mod api {
    /// 上游私有 API 的根地址。接口字段均为抓包推断，并非官方契约
    pub const BASE_URL: &str = "https://api.madeeasy.in/v1";
    /// 内容列表接口的固定类型过滤参数
    pub const CONTENT_TYPE_FILTER: &str = "exercises-notes-videos";
    /// 分页探测的硬上限，超过真实页数的请求只会得到无害的空页
    pub const MAX_CONTENT_PAGES: u32 = 12;
    /// 同一科目下分页请求的并发窗口
    pub const PAGE_FETCH_CONCURRENCY: usize = 4;
    /// 此域名下的资源是可直连的 CDN 文件，URL 原样保留
    pub const CDN_DIRECT_HOST: &str = "cloudfront.net";
    /// 流媒体清单链接的扩展名标记
    pub const STREAM_MANIFEST_MARKERS: [&str; 2] = [".mpd", ".m3u8"];

    pub mod content_types {
        pub const DEFAULT: &str = "video";
        pub const NOTES: &str = "notes";
    }
}

/// 清单末尾的固定落款: 空行之后三行横幅
pub const MANIFEST_FOOTER: &str =
    "\n━━━━━━━━━━━━━━━\nExtracted via MadeEasy Extractor\n━━━━━━━━━━━━━━━\n";
