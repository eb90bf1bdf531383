// src/source/validate.rs
// =============================================================================
// Decides whether a raw string is something the fetch loop can GET.
//
// Rule: it must parse as an absolute URL and its scheme must be exactly
// "http" or "https". Everything else (relative paths, "ftp:", "file:",
// "mailto:", plain text, empty lines) is dropped without a word.
// =============================================================================

use url::Url;

pub fn is_valid_url(raw: &str) -> bool {
    // Url::parse only accepts absolute URLs, relative input fails here
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

// Filters the loaded list, keeping input order.
pub fn validate(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .filter(|url| {
            let ok = is_valid_url(url);
            if !ok {
                tracing::debug!(%url, "skipping invalid url");
            }
            ok
        })
        .collect()
}
