use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::names::package::{assemble_sangtacviet, assemble_wikidich, NamePackage};
use crate::names::validator::ValidationStats;
use crate::network::session::Fetcher;
use crate::sites::{resolve, FetchLocator, SiteVariant};

pub use crate::names::export::{export_package, ExportFile};

pub const DEFAULT_PROXY_URL: &str = "https://web.scraper.workers.dev/";
pub const DEFAULT_STV_API_HOST: &str = "http://sangtacviet.app";
pub const DEFAULT_WIKIDICH_ELEMENT_ID: &str = "ddListName";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Represents errors that can occur while searching and exporting name packages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamepackError {
    #[error("Unsupported site: {0}")]
    UnsupportedSite(String),

    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("No names found: {0}")]
    EmptyResult(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Search #{0} was superseded by a newer search")]
    Superseded(u64),

    #[error("Package {0} does not exist")]
    PackageNotFound(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl NamepackError {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            NamepackError::UnsupportedSite(_)
            | NamepackError::MalformedUrl(_)
            | NamepackError::PackageNotFound(_)
            | NamepackError::ConfigError(_) => 2,
            NamepackError::EmptyResult(_) => 3,
            NamepackError::NetworkError(_) | NamepackError::ParseError(_) => 4,
            NamepackError::Superseded(_) | NamepackError::IoError(_) => 1,
        }
    }

    /// Prefixes the message with what was being attempted, keeping the variant
    pub fn context(self, what: &str) -> Self {
        match self {
            NamepackError::NetworkError(msg) => NamepackError::NetworkError(format!("{what}: {msg}")),
            NamepackError::ParseError(msg) => NamepackError::ParseError(format!("{what}: {msg}")),
            NamepackError::IoError(msg) => NamepackError::IoError(format!("{what}: {msg}")),
            other => other,
        }
    }
}

impl From<std::io::Error> for NamepackError {
    fn from(error: std::io::Error) -> Self {
        NamepackError::IoError(error.to_string())
    }
}

pub type NamepackResult<T> = Result<T, NamepackError>;

/// Configuration options for name package searches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamepackOptions {
    /// Scraping proxy that fronts the Sangtacviet name API
    pub proxy_url: String,
    /// Host substituted into Sangtacviet URLs to reach `namesys.php`
    pub stv_api_host: String,
    /// Id of the Wikidich element holding the name list
    pub wikidich_element_id: String,
    pub timeout: u64,
    pub user_agent: Option<String>,
    pub silent: bool,
}

impl Default for NamepackOptions {
    fn default() -> Self {
        NamepackOptions {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            stv_api_host: DEFAULT_STV_API_HOST.to_string(),
            wikidich_element_id: DEFAULT_WIKIDICH_ELEMENT_ID.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            silent: false,
        }
    }
}

/// Resolves a novel URL, fetches its names and assembles the packages.
///
/// URL problems are reported before any request is made. Fetch and parse failures keep their
/// variant with the site name added to the message.
pub fn search<F>(fetcher: &F, url: &str, options: &NamepackOptions) -> NamepackResult<Vec<NamePackage>>
where
    F: Fetcher + ?Sized,
{
    search_site(fetcher, url, options).map(|(_, packages)| packages)
}

fn search_site<F>(
    fetcher: &F,
    url: &str,
    options: &NamepackOptions,
) -> NamepackResult<(SiteVariant, Vec<NamePackage>)>
where
    F: Fetcher + ?Sized,
{
    let source = resolve(url, options)?;
    let what = format!("loading names from {}", source.variant);

    tracing::info!("Searching {} names for {}", source.variant, url.trim());

    let packages = match &source.locator {
        FetchLocator::ProxiedJson { url, .. } => {
            let payload = fetcher.fetch_json(url).map_err(|e| e.context(&what))?;
            assemble_sangtacviet(&payload)?
        }
        FetchLocator::Page { url, element_id } => {
            let page = fetcher.fetch_page(url).map_err(|e| e.context(&what))?;
            let slug = source.title_slug.as_deref().unwrap_or_default();
            let package = assemble_wikidich(&page.body, page.charset.as_deref(), element_id, slug)
                .map_err(|e| e.context(&what))?;
            vec![package]
        }
    };

    tracing::info!("Found {} package(s)", packages.len());

    Ok((source.variant, packages))
}

/// 一次成功搜索的结果集
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub generation: u64,
    pub source_url: String,
    pub site: SiteVariant,
    pub fetched_at: DateTime<Utc>,
    packages: Vec<NamePackage>,
}

impl ResultSet {
    pub fn new(generation: u64, source_url: &str, site: SiteVariant, packages: Vec<NamePackage>) -> Self {
        ResultSet {
            generation,
            source_url: source_url.trim().to_string(),
            site,
            fetched_at: Utc::now(),
            packages,
        }
    }

    pub fn packages(&self) -> &[NamePackage] {
        &self.packages
    }

    /// Looks a package up by its zero-based index
    pub fn package(&self, index: usize) -> NamepackResult<&NamePackage> {
        self.packages
            .get(index)
            .ok_or(NamepackError::PackageNotFound(index))
    }

    pub fn total_valid(&self) -> usize {
        self.packages.iter().map(NamePackage::valid_count).sum()
    }

    pub fn total_invalid(&self) -> usize {
        self.packages.iter().map(NamePackage::invalid_count).sum()
    }

    pub fn stats(&self) -> ValidationStats {
        let mut stats = ValidationStats::default();
        for package in &self.packages {
            stats.record(package.valid_count(), package.invalid_entries());
        }
        stats
    }

    pub fn fetched_at_rfc3339(&self) -> String {
        self.fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn export(&self, index: usize, use_original: bool) -> NamepackResult<ExportFile> {
        Ok(export_package(self.package(index)?, use_original))
    }
}

/// Handle for one in-flight search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 搜索上下文
///
/// Every search takes a ticket carrying a new generation number. Only the holder of the
/// latest ticket may publish; results from older searches are dropped so that a slow
/// response can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct SearchContext {
    generation: AtomicU64,
    current: RwLock<Option<Arc<ResultSet>>>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new search, superseding every earlier ticket
    pub fn begin(&self) -> SearchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket { generation }
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn commit(
        &self,
        ticket: SearchTicket,
        source_url: &str,
        site: SiteVariant,
        packages: Vec<NamePackage>,
    ) -> NamepackResult<Arc<ResultSet>> {
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Checked under the write lock so a newer commit cannot interleave
        if !self.is_current(ticket) {
            tracing::warn!(
                "dropping result of search #{} (latest is #{})",
                ticket.generation,
                self.latest_generation()
            );
            return Err(NamepackError::Superseded(ticket.generation));
        }

        let result = Arc::new(ResultSet::new(ticket.generation, source_url, site, packages));
        *current = Some(Arc::clone(&result));
        Ok(result)
    }

    /// Runs a full search and publishes it unless a newer one started meanwhile.
    ///
    /// A failed search clears the published result when it is still the latest, so stale
    /// packages from a previous URL are never shown next to an error.
    pub fn search<F>(&self, fetcher: &F, url: &str, options: &NamepackOptions) -> NamepackResult<Arc<ResultSet>>
    where
        F: Fetcher + ?Sized,
    {
        let ticket = self.begin();

        match search_site(fetcher, url, options) {
            Ok((site, packages)) => self.commit(ticket, url, site, packages),
            Err(error) => {
                self.clear_if_current(ticket);
                if self.is_current(ticket) {
                    Err(error)
                } else {
                    tracing::debug!(
                        "search #{} failed after being superseded: {}",
                        ticket.generation,
                        error
                    );
                    Err(NamepackError::Superseded(ticket.generation))
                }
            }
        }
    }

    fn clear_if_current(&self, ticket: SearchTicket) {
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.is_current(ticket) {
            *current = None;
        }
    }

    /// 当前已发布的结果
    pub fn current(&self) -> Option<Arc<ResultSet>> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Prints an error message to stderr, in red when stderr is a terminal
pub fn print_error_message(msg: &str) {
    use crate::env::{core::NoColor, EnvVar};

    if atty::is(atty::Stream::Stderr) && !NoColor::get_or_default(false) {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}
