use url::Url;

/// Turn a stored image reference into something a viewer can load.
///
/// Absolute `http(s)` URLs are returned as-is. Anything else is treated as
/// a path on `origin`.
pub fn resolve_asset_url(origin: &Url, path: &str) -> Option<Url> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(path)
        && matches!(url.scheme(), "http" | "https")
    {
        return Some(url);
    }
    origin.join(path.trim_start_matches('/')).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://api.example.com/").unwrap()
    }

    #[test]
    fn relative_paths_join_the_origin() {
        let url = resolve_asset_url(&origin(), "/uploads/ann.png").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/uploads/ann.png");

        let url = resolve_asset_url(&origin(), "uploads/ann.png").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/uploads/ann.png");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url =
            resolve_asset_url(&origin(), "https://cdn.example.net/a.png").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.net/a.png");
    }

    #[test]
    fn blank_paths_resolve_to_nothing() {
        assert!(resolve_asset_url(&origin(), "").is_none());
        assert!(resolve_asset_url(&origin(), "   ").is_none());
    }

    #[test]
    fn origin_with_base_path_is_kept() {
        let origin = Url::parse("https://example.com/api/").unwrap();
        let url = resolve_asset_url(&origin, "/img/a.png").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/img/a.png");
    }
}
