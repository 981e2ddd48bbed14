//! Async fetch layer for MPC bulletins.
//!
//! Every public method fails closed: network and disk errors are logged and turned into
//! a cached value, an empty list or `None`, never propagated to the caller.
use std::{
    collections::HashMap,
    sync::{LazyLock, Mutex, MutexGuard},
};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use serde::{de::IgnoredAny, Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    extract::designation_line,
    listing::{mpec_id_to_path, parse_recent_mpecs_html, MpecListing, MpecPage},
    parse, MpecDocument,
};
use crate::{cache::TtlCache, config::FetchConfig, constants::RECENT_MPECS_PATH, toolkit_errors::ToolkitError};

static URL_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/]+").expect("valid regex"));

/// A parsed bulletin with the paths of its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpecDetail {
    #[serde(flatten)]
    pub document: MpecDocument,
    pub prev_path: String,
    /// Empty on the newest circular
    pub next_path: String,
}

/// Bulletin returned by a designation lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpecReference {
    /// `MPEC 2026-C89`
    pub mpec_id: String,
    /// `/mpec/K26/K26C89.html`
    pub path: String,
    pub title: String,
    /// Publication date, `2026 Feb 13`
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiMpec {
    link: String,
    fullname: String,
    title: String,
    pubdate: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiEntry {
    Mpecs(Vec<ApiMpec>),
    Other(IgnoredAny),
}

/// The API answers either a map keyed by designation or a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiResponse {
    ByDesignation(HashMap<String, ApiEntry>),
    Flat(Vec<ApiMpec>),
}

impl ApiResponse {
    fn into_items(self) -> Vec<ApiMpec> {
        match self {
            ApiResponse::Flat(items) => items,
            ApiResponse::ByDesignation(map) => map
                .into_values()
                .filter_map(|entry| match entry {
                    ApiEntry::Mpecs(items) => Some(items),
                    ApiEntry::Other(_) => None,
                })
                .flatten()
                .collect(),
        }
    }
}

/// Parse an RFC 2822 publication date (`Fri, 13 Feb 2026 15:42:00 +0000`).
///
/// The instant is normalized to UTC, so the display date is the UTC calendar day.
///
/// Return
/// ------
/// * The UTC instant used for ordering and the display date `2026 Feb 13`
fn parse_pubdate(pubdate: &str) -> Option<(DateTime<Utc>, String)> {
    let instant = DateTime::parse_from_rfc2822(pubdate.trim())
        .ok()?
        .with_timezone(&Utc);
    Some((instant, instant.format("%Y %b %d").to_string()))
}

fn api_items_to_references(items: Vec<ApiMpec>) -> Vec<MpecReference> {
    let mut dated: Vec<(Option<DateTime<Utc>>, MpecReference)> = items
        .into_iter()
        .map(|item| {
            let parsed = parse_pubdate(&item.pubdate);
            let reference = MpecReference {
                mpec_id: if item.fullname.is_empty() {
                    String::new()
                } else {
                    format!("MPEC {}", item.fullname)
                },
                path: URL_ROOT.replace(&item.link, "").into_owned(),
                title: item.title,
                date: parsed
                    .as_ref()
                    .map_or_else(|| item.pubdate.clone(), |(_, date)| date.clone()),
            };
            (parsed.map(|(instant, _)| instant), reference)
        })
        .collect();

    // earliest first, undated entries in front
    dated.sort_by_key(|(instant, _)| *instant);
    dated.into_iter().map(|(_, reference)| reference).collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Disk cache file names of a page path: `/mpec/K26/K26CA5.html` gives
/// `mpec_K26_K26CA5.html.txt` and `mpec_K26_K26CA5.html.nav`.
fn cache_files(dir: &Utf8Path, path: &str) -> (Utf8PathBuf, Utf8PathBuf) {
    let stem = path.replace('/', "_");
    let stem = stem.trim_matches('_');
    (dir.join(format!("{stem}.txt")), dir.join(format!("{stem}.nav")))
}

fn parse_nav(content: &str) -> (String, String) {
    let mut lines = content.split('\n');
    let prev = lines.next().unwrap_or_default().trim().to_string();
    let next = lines.next().unwrap_or_default().trim().to_string();
    (prev, next)
}

/// HTTP client for MPC bulletins with its caches.
///
/// The RecentMPECs list is kept for [`FetchConfig::list_ttl`]. Bulletin texts are
/// cached on disk forever when [`FetchConfig::cache_dir`] is set. Designation lookups are
/// memoized in an injected [`TtlCache`].
#[derive(Debug)]
pub struct MpecClient {
    http: Client,
    config: FetchConfig,
    recent: Mutex<TtlCache<(), Vec<MpecListing>>>,
    lookups: Mutex<TtlCache<String, Vec<MpecReference>>>,
}

impl MpecClient {
    /// Build a client from its configuration.
    ///
    /// Return
    /// ------
    /// * `ToolkitError::Http` if the underlying HTTP client cannot be built
    pub fn new(config: FetchConfig) -> Result<Self, ToolkitError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(MpecClient {
            http,
            recent: Mutex::new(TtlCache::with_ttl(config.list_ttl)),
            lookups: Mutex::new(TtlCache::new(config.lookup_ttl, None)),
            config,
        })
    }

    /// Replace the designation lookup cache, e.g. to share one between clients.
    pub fn with_lookup_cache(mut self, cache: TtlCache<String, Vec<MpecReference>>) -> Self {
        self.lookups = Mutex::new(cache);
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ToolkitError> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        if body.is_empty() {
            return Err(ToolkitError::EmptyResponse(url.to_string()));
        }
        Ok(body)
    }

    /// Recent circulars from MPC's RecentMPECs page, all types included.
    ///
    /// Arguments
    /// ---------
    /// * `force`: bypass the TTL and refetch the page
    ///
    /// Return
    /// ------
    /// * The fresh list, or on failure the last list fetched (possibly expired), or an
    ///   empty list
    pub async fn fetch_recent(&self, force: bool) -> Vec<MpecListing> {
        if !force {
            if let Some(list) = lock(&self.recent).get(&()) {
                return list.clone();
            }
        }

        let url = self.config.url(RECENT_MPECS_PATH);
        match self.fetch_text(&url).await {
            Ok(html) => {
                let list = parse_recent_mpecs_html(&html);
                info!(count = list.len(), "fetched recent MPECs");
                lock(&self.recent).insert((), list.clone());
                list
            }
            Err(err) => {
                warn!(%url, error = %err, "unable to fetch recent MPECs");
                lock(&self.recent).peek(&()).cloned().unwrap_or_default()
            }
        }
    }

    /// Fetch and parse one bulletin page.
    ///
    /// With a disk cache, a cached text is parsed without network access. Its navigation
    /// links are refetched only when no next circular was known yet.
    ///
    /// Arguments
    /// ---------
    /// * `path`: page path such as `/mpec/K26/K26CB9.html`
    ///
    /// Return
    /// ------
    /// * `None` when the page is neither cached nor reachable
    pub async fn fetch_detail(&self, path: &str) -> Option<MpecDetail> {
        let cache = match &self.config.cache_dir {
            Some(dir) => match tokio::fs::create_dir_all(dir).await {
                Ok(()) => Some(cache_files(dir, path)),
                Err(err) => {
                    warn!(%dir, error = %err, "MPEC disk cache unavailable");
                    None
                }
            },
            None => None,
        };

        if let Some((text_file, nav_file)) = &cache {
            if let Ok(text) = tokio::fs::read_to_string(text_file).await {
                debug!(%text_file, "MPEC served from disk cache");
                return Some(self.detail_from_cache(path, &text, nav_file).await);
            }
        }

        let url = self.config.url(path);
        let html = match self.fetch_text(&url).await {
            Ok(html) => html,
            Err(err) => {
                warn!(%url, error = %err, "unable to fetch MPEC");
                return None;
            }
        };
        let page = MpecPage::from_html(&html);

        if let Some((text_file, nav_file)) = &cache {
            if !page.pre_text.is_empty() {
                if let Err(err) = tokio::fs::write(text_file, &page.pre_text).await {
                    warn!(%text_file, error = %err, "unable to cache MPEC text");
                }
                write_nav(nav_file, &page.prev_path, &page.next_path).await;
            }
        }

        let mut document = parse(
            &page.pre_text,
            Some(page.mpec_id.as_str()),
            Some(page.title.as_str()),
            Some(path),
        );
        document.mpec_url = url;
        Some(MpecDetail {
            document,
            prev_path: page.prev_path,
            next_path: page.next_path,
        })
    }

    async fn detail_from_cache(&self, path: &str, text: &str, nav_file: &Utf8Path) -> MpecDetail {
        let title = designation_line(text).unwrap_or_default();
        let mut document = parse(text, None, Some(title.as_str()), Some(path));
        document.mpec_url = self.config.url(path);

        let (cached_prev, cached_next) = tokio::fs::read_to_string(nav_file)
            .await
            .map(|content| parse_nav(&content))
            .unwrap_or_default();
        if !cached_next.is_empty() {
            return MpecDetail {
                document,
                prev_path: cached_prev,
                next_path: cached_next,
            };
        }

        // a newer circular may have been published since the cache was written
        let url = self.config.url(path);
        let (prev_path, next_path) = match self.fetch_text(&url).await {
            Ok(html) => {
                let page = MpecPage::from_html(&html);
                write_nav(nav_file, &page.prev_path, &page.next_path).await;
                (page.prev_path, page.next_path)
            }
            Err(err) => {
                debug!(%url, error = %err, "keeping cached MPEC navigation");
                (cached_prev, cached_next)
            }
        };
        MpecDetail {
            document,
            prev_path,
            next_path,
        }
    }

    /// Fetch a bulletin by its identifier (`2026-C105` or `MPEC 2026-C105`).
    pub async fn fetch_by_id(&self, mpec_id: &str) -> Option<MpecDetail> {
        match mpec_id_to_path(mpec_id) {
            Ok(path) => self.fetch_detail(&path).await,
            Err(err) => {
                warn!(error = %err, "cannot locate MPEC");
                None
            }
        }
    }

    /// Circulars mentioning a designation, from the MPC MPEC API.
    ///
    /// Successful answers are memoized per upper-cased designation; failures are not.
    ///
    /// Arguments
    /// ---------
    /// * `designation`: any form the API accepts (`2026 CY1`, `K24Y04R`, `433`, `C/2026 A1`)
    ///
    /// Return
    /// ------
    /// * References sorted by publication date, earliest first
    pub async fn lookup_by_designation(&self, designation: &str) -> Vec<MpecReference> {
        let query = designation.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let key = query.to_uppercase();
        if let Some(found) = lock(&self.lookups).get(&key) {
            return found.clone();
        }

        let response = match self.query_api(query).await {
            Ok(response) => response,
            Err(err) => {
                warn!(designation = query, error = %err, "MPEC API lookup failed");
                return Vec::new();
            }
        };
        let references = api_items_to_references(response.into_items());
        debug!(designation = query, count = references.len(), "MPEC API lookup");
        lock(&self.lookups).insert(key, references.clone());
        references
    }

    async fn query_api(&self, query: &str) -> Result<ApiResponse, ToolkitError> {
        // the API reads a JSON array body even on GET
        Ok(self
            .http
            .get(&self.config.api_url)
            .json(&[query])
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse>()
            .await?)
    }
}

async fn write_nav(nav_file: &Utf8Path, prev: &str, next: &str) {
    if prev.is_empty() && next.is_empty() {
        return;
    }
    if let Err(err) = tokio::fs::write(nav_file, format!("{prev}\n{next}\n")).await {
        warn!(%nav_file, error = %err, "unable to cache MPEC navigation");
    }
}

#[cfg(test)]
mod client_test {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;
    use crate::mpec::MpecType;

    const CACHED_TEXT: &str = "\
M.P.E.C. 2026-C105                               Issued 2026 Feb. 13, 15:42 UT

                                 2026 CE3

Observer details:
G96 Mt. Lemmon Survey.
";

    /// Client pointing at a closed local port: every request fails fast.
    fn offline_client(dir: Option<&Utf8Path>) -> MpecClient {
        let mut config = FetchConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_api_url("http://127.0.0.1:9/api/mpecs")
            .with_timeout(Duration::from_secs(2));
        if let Some(dir) = dir {
            config = config.with_cache_dir(dir);
        }
        MpecClient::new(config).unwrap()
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_cache_files() {
        let (text, nav) = cache_files(Utf8Path::new("/cache"), "/mpec/K26/K26CA5.html");
        assert_eq!(text.as_str(), "/cache/mpec_K26_K26CA5.html.txt");
        assert_eq!(nav.as_str(), "/cache/mpec_K26_K26CA5.html.nav");
        assert_eq!(parse_nav("/a.html\n\n"), ("/a.html".into(), "".into()));
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parse_pubdate() {
        let (instant, date) = parse_pubdate("Fri, 13 Feb 2026 15:42:00 +0000").unwrap();
        assert_eq!(date, "2026 Feb 13");
        assert_eq!(instant, utc(2026, 2, 13, 15, 42));
        assert_eq!(parse_pubdate(" 3 Jan 2025 08:00:00 GMT").unwrap().1, "2025 Jan 03");
        assert!(parse_pubdate("yesterday").is_none());
    }

    #[test]
    fn test_parse_pubdate_applies_offset() {
        // 23:30 in UTC-5 is already the next day in UTC
        let (instant, date) = parse_pubdate("Fri, 13 Feb 2026 23:30:00 -0500").unwrap();
        assert_eq!(instant, utc(2026, 2, 14, 4, 30));
        assert_eq!(date, "2026 Feb 14");

        let (instant, date) = parse_pubdate("Sat, 14 Feb 2026 01:00:00 +0900").unwrap();
        assert_eq!(instant, utc(2026, 2, 13, 16, 0));
        assert_eq!(date, "2026 Feb 13");
    }

    #[test]
    fn test_api_items_sorted_by_utc_instant() {
        let item = |fullname: &str, pubdate: &str| ApiMpec {
            link: format!("https://www.minorplanetcenter.net/mpec/K26/K26{fullname}.html"),
            fullname: format!("2026-{fullname}"),
            title: "2026 CY1".into(),
            pubdate: pubdate.into(),
        };
        // wall clocks sort the other way round
        let refs = api_items_to_references(vec![
            item("C20", "Fri, 13 Feb 2026 12:00:00 +0000"),
            item("C19", "Fri, 13 Feb 2026 20:00:00 +1000"),
        ]);
        assert_eq!(refs[0].mpec_id, "MPEC 2026-C19");
        assert_eq!(refs[1].mpec_id, "MPEC 2026-C20");
    }

    #[test]
    fn test_api_items_sorted() {
        let items = vec![
            ApiMpec {
                link: "https://www.minorplanetcenter.net/mpec/K26/K26C89.html".into(),
                fullname: "2026-C89".into(),
                title: "2026 CY1".into(),
                pubdate: "Fri, 13 Feb 2026 10:00:00 +0000".into(),
            },
            ApiMpec {
                link: "https://www.minorplanetcenter.net/mpec/K26/K26C10.html".into(),
                fullname: "2026-C10".into(),
                title: "2026 CY1".into(),
                pubdate: "Mon, 02 Feb 2026 08:00:00 +0000".into(),
            },
        ];
        let refs = api_items_to_references(items);
        assert_eq!(refs[0].mpec_id, "MPEC 2026-C10");
        assert_eq!(refs[0].path, "/mpec/K26/K26C10.html");
        assert_eq!(refs[0].date, "2026 Feb 02");
        assert_eq!(refs[1].mpec_id, "MPEC 2026-C89");
    }

    #[tokio::test]
    async fn test_detail_from_disk_cache() {
        let (_tmp, dir) = temp_dir();
        let path = "/mpec/K26/K26CA5.html";
        let (text_file, nav_file) = cache_files(&dir, path);
        std::fs::write(&text_file, CACHED_TEXT).unwrap();
        std::fs::write(&nav_file, "/mpec/K26/K26CA4.html\n/mpec/K26/K26CA6.html\n").unwrap();

        let client = offline_client(Some(dir.as_path()));
        let detail = client.fetch_detail(path).await.unwrap();
        assert_eq!(detail.document.mpec_id, "MPEC 2026-C105");
        assert_eq!(detail.document.title, "2026 CE3");
        assert_eq!(detail.document.designation.as_deref(), Some("2026 CE3"));
        assert_eq!(detail.document.kind, MpecType::Recovery);
        assert_eq!(detail.document.mpec_url, "http://127.0.0.1:9/mpec/K26/K26CA5.html");
        assert_eq!(detail.prev_path, "/mpec/K26/K26CA4.html");
        assert_eq!(detail.next_path, "/mpec/K26/K26CA6.html");
    }

    #[tokio::test]
    async fn test_cached_navigation_kept_offline() {
        let (_tmp, dir) = temp_dir();
        let path = "/mpec/K26/K26CA5.html";
        let (text_file, nav_file) = cache_files(&dir, path);
        std::fs::write(&text_file, CACHED_TEXT).unwrap();
        std::fs::write(&nav_file, "/mpec/K26/K26CA4.html\n\n").unwrap();

        let detail = offline_client(Some(dir.as_path())).fetch_detail(path).await.unwrap();
        assert_eq!(detail.prev_path, "/mpec/K26/K26CA4.html");
        assert_eq!(detail.next_path, "");
    }

    #[tokio::test]
    async fn test_fail_closed() {
        let client = offline_client(None);
        assert!(client.fetch_recent(false).await.is_empty());
        assert!(client.fetch_detail("/mpec/K26/K26CA5.html").await.is_none());
        assert!(client.fetch_by_id("not an id").await.is_none());
        assert!(client.lookup_by_designation("2026 CE3").await.is_empty());
        assert!(client.lookup_by_designation("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_injected_lookup_cache() {
        let mut cache = TtlCache::default();
        let reference = MpecReference {
            mpec_id: "MPEC 2026-C89".into(),
            path: "/mpec/K26/K26C89.html".into(),
            title: "2026 CY1".into(),
            date: "2026 Feb 13".into(),
        };
        cache.insert("2026 CY1".to_string(), vec![reference.clone()]);

        let client = offline_client(None).with_lookup_cache(cache);
        assert_eq!(client.lookup_by_designation(" 2026 cy1 ").await, vec![reference]);
    }
}
