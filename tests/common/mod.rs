// 集成测试公共模块
//
// 提供内存中的抓取器和站点响应样例

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use namepack::core::{NamepackError, NamepackOptions, NamepackResult};
use namepack::network::{FetchedPage, Fetcher};
use namepack::sites::{resolve, FetchLocator};

pub const STV_URL: &str = "https://sangtacviet.vip/truyen/qidian/1/1037277/";
pub const WIKI_URL: &str = "https://truyenwikidich.net/truyen/kiem-lai-a1B2";

/// Sangtacviet response with one block: one valid line, two rejected ones
pub const STV_SCENARIO: &str =
    r#"{"result":{"div":["$你好=Xin chào\n$我=tôi\n$朋友你好=xin chào bạn"]}}"#;

/// Sangtacviet response with two blocks
pub const STV_TWO_BLOCKS: &str = r#"{"result":{"div":[
    "$林风=Lâm Phong\n$苏瑶=Tô Dao\n$剑=Kiếm",
    "$天元宗=Thiên Nguyên Tông\n$a=b=c\n\n$长老=trưởng lão"
]}}"#;

pub const STV_EMPTY: &str = r#"{"result":{"div":[]}}"#;

pub const WIKI_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Kiếm Lai</title></head>
<body>
  <div class="panel">
    <textarea id="ddListName">
林风=Lâm Phong
  苏瑶=Tô Dao

剑=kiếm
    </textarea>
  </div>
</body>
</html>"#;

/// Wikidich page in GBK that only declares its encoding in a `<meta>` tag
pub const WIKI_PAGE_GBK: &str = r#"<html>
<head><meta http-equiv="Content-Type" content="text/html; charset=gbk"></head>
<body><textarea id="ddListName">林风=Lam Phong
天元宗=Thien Nguyen Tong</textarea></body>
</html>"#;

pub const WIKI_PAGE_WITHOUT_LIST: &str =
    "<html><body><p>Chưa có name chung</p></body></html>";

/// In-memory fetcher that records every requested URL
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, NamepackResult<String>>,
    raw_pages: HashMap<String, FetchedPage>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers the locator that `page_url` resolves to with `body`
    pub fn with_page(mut self, page_url: &str, body: &str) -> Self {
        self.responses
            .insert(locator_for(page_url), Ok(body.to_string()));
        self
    }

    /// Answers with undecoded bytes, as a server sending a legacy encoding would
    pub fn with_raw_page(mut self, page_url: &str, body: Vec<u8>, charset: Option<&str>) -> Self {
        self.raw_pages.insert(
            locator_for(page_url),
            FetchedPage {
                body,
                charset: charset.map(str::to_string),
            },
        );
        self
    }

    pub fn with_failure(mut self, page_url: &str, error: NamepackError) -> Self {
        self.responses.insert(locator_for(page_url), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch_text(&self, url: &str) -> NamepackResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(response) => response.clone(),
            None => Err(NamepackError::NetworkError(
                "HTTP error! status: 404".to_string(),
            )),
        }
    }

    fn fetch_page(&self, url: &str) -> NamepackResult<FetchedPage> {
        match self.raw_pages.get(url) {
            Some(page) => {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.requested.lock().unwrap().push(url.to_string());
                Ok(page.clone())
            }
            None => Ok(FetchedPage {
                body: self.fetch_text(url)?.into_bytes(),
                charset: Some("utf-8".to_string()),
            }),
        }
    }
}

/// The URL actually fetched for a novel page under default options
pub fn locator_for(page_url: &str) -> String {
    match resolve(page_url, &NamepackOptions::default()) {
        Ok(source) => match source.locator {
            FetchLocator::ProxiedJson { url, .. } | FetchLocator::Page { url, .. } => url,
        },
        Err(_) => page_url.to_string(),
    }
}

/// Counts the non-blank lines of a text
pub fn non_blank_lines(text: &str) -> usize {
    text.split('\n').filter(|line| !line.trim().is_empty()).count()
}
