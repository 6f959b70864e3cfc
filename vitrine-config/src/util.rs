use url::Url;

use crate::loader::error::ConfigLoadError;

/// Normalize a user-supplied base URL.
///
/// Adds `http://` when no scheme is given and guarantees a trailing slash
/// so relative route joins append instead of replacing the last segment.
pub fn normalize_base_url(key: &str, raw: &str) -> Result<Url, ConfigLoadError> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
    {
        trimmed.to_string()
    } else if trimmed.contains("://") {
        let scheme = trimmed.split("://").next().unwrap_or_default();
        return Err(ConfigLoadError::UnsupportedScheme {
            key: key.to_string(),
            scheme: scheme.to_string(),
        });
    } else {
        format!("http://{trimmed}")
    };

    let mut url =
        Url::parse(&with_scheme).map_err(|source| ConfigLoadError::InvalidUrl {
            key: key.to_string(),
            value: raw.to_string(),
            source,
        })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    if url.as_str() != raw {
        tracing::debug!(key, from = raw, to = %url, "normalized base URL");
    }

    Ok(url)
}

/// Treat blank values the same as unset ones.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
