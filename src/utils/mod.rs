//! Utility functions and helpers.

pub mod log;

use std::path::Path;

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Read a username list file, one name per line.
///
/// Blank lines and surrounding whitespace are ignored.
pub async fn read_usernames(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.acmicpc.net/status?user_id=alice").unwrap();
        assert_eq!(
            resolve_url(&base, "/status?user_id=alice&top=100"),
            "https://www.acmicpc.net/status?user_id=alice&top=100"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_resolve_url_invalid_href_falls_back() {
        let base = Url::parse("https://www.acmicpc.net/").unwrap();
        assert_eq!(resolve_url(&base, "http://[bad"), "http://[bad");
    }

    #[tokio::test]
    async fn test_read_usernames_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alice").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  bob  ").unwrap();
        writeln!(file, "carol").unwrap();

        let names = read_usernames(file.path()).await.unwrap();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_read_usernames_missing_file() {
        let result = read_usernames("/nonexistent/users.txt").await;
        assert!(result.is_err());
    }
}
