//! Target URL construction for the origin fetch.

use crate::config::UpstreamConfig;

/// Build the absolute origin URL for a proxied request path.
///
/// The configured mount path is prepended so a sub-app mounted at `/post`
/// fetches `/post/...` from the origin. In root-proxying (preview) mode the
/// path is passed as-is regardless of the mount point. Only the first
/// double slash produced by the join is collapsed.
pub fn build_target_url(config: &UpstreamConfig, path: &str, query: Option<&str>) -> String {
    let full_path = if !config.proxy_target_root && !config.mount_path.is_empty() {
        format!("{}{}", config.mount_path, path).replacen("//", "/", 1)
    } else {
        path.to_string()
    };

    match query {
        Some(query) => format!("{}{}?{}", config.origin, full_path, query),
        None => format!("{}{}", config.origin, full_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mount_path: &str, proxy_target_root: bool) -> UpstreamConfig {
        UpstreamConfig {
            origin: "https://site.example.com".to_string(),
            mount_path: mount_path.to_string(),
            proxy_target_root,
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn joins_origin_and_path() {
        assert_eq!(
            build_target_url(&config("", false), "/about", None),
            "https://site.example.com/about"
        );
    }

    #[test]
    fn prepends_the_mount_path() {
        assert_eq!(
            build_target_url(&config("/post", false), "/about", None),
            "https://site.example.com/post/about"
        );
    }

    #[test]
    fn collapses_the_first_double_slash() {
        assert_eq!(
            build_target_url(&config("/post/", false), "/about", None),
            "https://site.example.com/post/about"
        );
    }

    #[test]
    fn preview_mode_ignores_the_mount_path() {
        assert_eq!(
            build_target_url(&config("/post", true), "/about", None),
            "https://site.example.com/about"
        );
    }

    #[test]
    fn appends_the_query_string() {
        assert_eq!(
            build_target_url(&config("", false), "/search", Some("q=x&page=2")),
            "https://site.example.com/search?q=x&page=2"
        );
    }
}
