//! Scraping of MPC HTML pages: the RecentMPECs index and individual bulletin pages.
//!
//! The MPC pages are small and regular, so extraction is done with anchored regexes on
//! known blocks (`<pre>`, `<title>`, navigation anchors) rather than a DOM parser.
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use super::classify::{classify, MpecType};
use crate::{
    constants::MPC_BASE_URL,
    designation::encode_cycle,
    toolkit_errors::ToolkitError,
};

static MPEC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:MPEC\s+)?(\d{4})-([A-Z])(\d+)").expect("valid regex"));
static RECENT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<a\s+href="(/mpec/[^"]+)"><i>MPEC</i>\s*([^<]+)</a>\s*\(([^)]+)\).*?<li>([^<]+)"#,
    )
    .expect("valid regex")
});
static PRE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").expect("valid regex"));
static TITLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#).expect("valid regex")
});
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\s[^>]*?src\s*=\s*"([^"]*)""#).expect("valid regex")
});
static PAGE_MPEC_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(MPEC\s+\S+)").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex")
});

/// MPC page path of a circular: `2026-C105` gives `/mpec/K26/K26CA5.html`.
///
/// The year packs like a provisional designation (`K26`), the circular number like a
/// designation cycle count (`105` → `A5`). A leading `MPEC ` is accepted.
pub fn mpec_id_to_path(mpec_id: &str) -> Result<String, ToolkitError> {
    let invalid = || ToolkitError::InvalidMpecId(mpec_id.to_string());

    let caps = MPEC_ID.captures(mpec_id.trim()).ok_or_else(invalid)?;
    let year: u32 = caps[1].parse().map_err(|_| invalid())?;
    let number: u32 = caps[3].parse().map_err(|_| invalid())?;

    let century = match year / 100 {
        18 => 'I',
        19 => 'J',
        20 => 'K',
        _ => return Err(invalid()),
    };
    let packed_year = format!("{century}{:02}", year % 100);
    let packed_number = encode_cycle(number).ok_or_else(invalid)?;

    Ok(format!(
        "/mpec/{packed_year}/{packed_year}{}{packed_number}.html",
        &caps[2]
    ))
}

/// Full MPC URL of a circular, see [`mpec_id_to_path`].
pub fn mpec_id_to_url(mpec_id: &str) -> Result<String, ToolkitError> {
    Ok(format!("{MPC_BASE_URL}{}", mpec_id_to_path(mpec_id)?))
}

/// Decode the HTML character references MPC pages use.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16).ok())
                    .unwrap_or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Text content of an HTML fragment: tags removed, character references decoded.
pub fn strip_tags(html: &str) -> String {
    decode_entities(&TAG.replace_all(html, ""))
}

/// One entry of the RecentMPECs page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MpecListing {
    /// `MPEC 2026-C119`
    pub mpec_id: String,
    /// `/mpec/K26/K26CB9.html`
    pub path: String,
    pub title: String,
    pub date: String,
    /// Title-only classification
    #[serde(rename = "type")]
    pub kind: MpecType,
}

/// Parse MPC's RecentMPECs page.
///
/// Each entry looks like
/// `<li><a href="/mpec/K26/K26CB9.html"><i>MPEC</i> 2026-C119</a> (date) <ul><li>TITLE</ul>`.
pub fn parse_recent_mpecs_html(html: &str) -> Vec<MpecListing> {
    RECENT_ENTRY
        .captures_iter(html)
        .map(|caps| {
            let title = decode_entities(caps[4].trim());
            MpecListing {
                mpec_id: format!("MPEC {}", caps[2].trim()),
                path: caps[1].trim().to_string(),
                date: caps[3].trim().to_string(),
                kind: classify(&title, ""),
                title,
            }
        })
        .collect()
}

/// Content of one MPC bulletin page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MpecPage {
    /// Text of the `<pre>` block
    pub pre_text: String,
    /// Page `<title>`, e.g. `MPEC 2026-C105 : 2026 CE3`
    pub page_title: String,
    /// `MPEC 2026-C105`, empty when the page title does not start with it
    pub mpec_id: String,
    /// Bulletin title, the part of the page title after ` : `
    pub title: String,
    /// Path of the previous circular
    pub prev_path: String,
    /// Path of the next circular, empty on the newest one
    pub next_path: String,
}

impl MpecPage {
    pub fn from_html(html: &str) -> MpecPage {
        let pre_text = PRE_BLOCK
            .captures(html)
            .map(|caps| strip_tags(&caps[1]))
            .unwrap_or_default();
        let page_title = TITLE_BLOCK
            .captures(html)
            .map(|caps| strip_tags(&caps[1]).trim().to_string())
            .unwrap_or_default();

        let mpec_id = PAGE_MPEC_ID
            .captures(&page_title)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();
        let title = page_title
            .split_once(" : ")
            .map(|(_, title)| title.trim().to_string())
            .unwrap_or_default();

        let (prev_path, next_path) = navigation_paths(html);
        MpecPage {
            pre_text,
            page_title,
            mpec_id,
            title,
            prev_path,
            next_path,
        }
    }
}

/// Hrefs of the anchors wrapping the `LArrow` and `RArrow` navigation images.
fn navigation_paths(html: &str) -> (String, String) {
    let mut prev = String::new();
    let mut next = String::new();
    for anchor in ANCHOR.captures_iter(html) {
        let href = anchor[1].trim();
        if href.is_empty() {
            continue;
        }
        for img in IMG_SRC.captures_iter(&anchor[2]) {
            if img[1].contains("LArrow") {
                prev = href.to_string();
            } else if img[1].contains("RArrow") {
                next = href.to_string();
            }
        }
    }
    (prev, next)
}

#[cfg(test)]
mod listing_test {
    use super::*;

    #[test]
    fn test_mpec_id_to_url() {
        assert_eq!(
            mpec_id_to_url("2026-C105").unwrap(),
            "https://www.minorplanetcenter.net/mpec/K26/K26CA5.html"
        );
        assert_eq!(mpec_id_to_path("MPEC 2026-C89").unwrap(), "/mpec/K26/K26C89.html");
        assert_eq!(mpec_id_to_path("1999-A07").unwrap(), "/mpec/J99/J99A07.html");
        assert_eq!(mpec_id_to_path("2026-C359").unwrap(), "/mpec/K26/K26CZ9.html");
        assert_eq!(
            mpec_id_to_path("C105"),
            Err(ToolkitError::InvalidMpecId("C105".into()))
        );
        assert!(mpec_id_to_path("2126-C105").is_err());
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&#39;Oumuamua &#x41;"), "'Oumuamua A");
        assert_eq!(decode_entities("&bogus; &#xZZ;"), "&bogus; &#xZZ;");
        assert_eq!(strip_tags("<b>2026 <i>CE3</i></b> &amp; co"), "2026 CE3 & co");
    }

    #[test]
    fn test_parse_recent_list() {
        let html = r#"<ul>
<li><a href="/mpec/K26/K26CB9.html"><i>MPEC</i> 2026-C119</a> (2026 Feb. 14, 10:02 UT)
   <ul><li>2026 CE3</ul>
<li><a href="/mpec/K26/K26CC0.html"><i>MPEC</i> 2026-C120</a> (2026 Feb. 14, 12:00 UT)
   <ul><li>DAILY ORBIT UPDATE (2026 Feb. 14 UT)</ul>
</ul>"#;
        let entries = parse_recent_mpecs_html(html);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].mpec_id, "MPEC 2026-C119");
        assert_eq!(entries[0].path, "/mpec/K26/K26CB9.html");
        assert_eq!(entries[0].date, "2026 Feb. 14, 10:02 UT");
        assert_eq!(entries[0].title, "2026 CE3");
        assert_eq!(entries[1].kind, MpecType::Editorial);
    }

    #[test]
    fn test_page_from_html() {
        let html = r#"<html><head><title>MPEC 2026-C105 : 2026 CE3</title></head>
<body>
<a href="/mpec/K26/K26CA4.html"><img src="/iau/figs/LArrow.gif"></a>
<a href="/mpec/RecentMPECs.html"><img src="/iau/figs/UArrow.gif"></a>
<a href="/mpec/K26/K26CA6.html"><img src="/iau/figs/RArrow.gif"></a>
<pre>
<b>M.P.E.C. 2026-C105</b>
                          <b>2026 CE3</b>
Observer details:
Code &amp; name
</pre>
</body></html>"#;
        let page = MpecPage::from_html(html);
        assert_eq!(page.mpec_id, "MPEC 2026-C105");
        assert_eq!(page.title, "2026 CE3");
        assert_eq!(page.prev_path, "/mpec/K26/K26CA4.html");
        assert_eq!(page.next_path, "/mpec/K26/K26CA6.html");
        assert!(page.pre_text.starts_with("\nM.P.E.C. 2026-C105\n"));
        assert!(page.pre_text.contains("Code & name"));
        assert!(!page.pre_text.contains("<b>"));
    }

    #[test]
    fn test_page_without_navigation() {
        let page = MpecPage::from_html("<title>Not an MPEC</title>");
        assert_eq!(page.mpec_id, "");
        assert_eq!(page.title, "");
        assert_eq!(page.pre_text, "");
        assert_eq!(page.next_path, "");
    }
}
