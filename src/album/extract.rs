use super::ImageInfo;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const DEFAULT_FILENAME: &str = "unknown.jpg";

const ALBUM_PAGE_BASE: &str = "https://photos.app.goo.gl/";

// Checked in order, first match wins.
const ALBUM_ID_PATTERNS: &[&str] = &[
    r"photos\.app\.goo\.gl/([a-zA-Z0-9_-]+)",
    r"goo\.gl/photos/([a-zA-Z0-9_-]+)",
    r"google\.com/photos/album/([a-zA-Z0-9_-]+)",
];

const IMAGE_URL_PATTERNS: &[&str] = &[
    r#"https://lh3\.googleusercontent\.com/[^"'\s]+"#,
    r#"https://photos\.google\.com/share/[^"'\s]+"#,
    r#"https://drive\.google\.com/file/d/[^"'\s]+"#,
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
        .collect()
}

fn album_id_regexes() -> &'static [Regex] {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEXES.get_or_init(|| compile(ALBUM_ID_PATTERNS))
}

fn image_url_regexes() -> &'static [Regex] {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEXES.get_or_init(|| compile(IMAGE_URL_PATTERNS))
}

/// Pulls the album identifier out of a share URL.
///
/// Returns `None` when the URL matches none of the known album link shapes.
pub fn extract_album_id(url: &str) -> Option<&str> {
    album_id_regexes().iter().find_map(|regex| {
        regex
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}

/// Canonical page URL for an album identifier.
pub fn album_page_url(album_id: &str) -> String {
    format!("{}{}", ALBUM_PAGE_BASE, album_id)
}

/// Scans raw album HTML for hosted image URLs.
///
/// Results keep discovery order (all matches of the first pattern, then the
/// second, and so on) and each URL appears once.
pub fn extract_image_urls(html: &str) -> Vec<ImageInfo> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for regex in image_url_regexes() {
        for m in regex.find_iter(html) {
            let url = m.as_str().trim().trim_matches(['"', '\'']);

            if !seen.insert(url.to_string()) {
                continue;
            }

            images.push(ImageInfo {
                url: url.to_string(),
                filename: extract_filename(url),
            });
        }
    }

    images
}

/// Last path segment of `url` without its query string.
pub fn extract_filename(url: &str) -> String {
    let Some((_, last)) = url.rsplit_once('/') else {
        return DEFAULT_FILENAME.to_string();
    };

    let name = last.split_once('?').map_or(last, |(name, _)| name);
    if name.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        name.to_string()
    }
}
