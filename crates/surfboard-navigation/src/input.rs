//! Input resolution for the address bar
//!
//! 1. Input with a recognized scheme prefix → navigate verbatim
//! 2. Anything else → search with the configured engine

use url::form_urlencoded;
use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Schemes that mark input as an absolute URI
pub const RECOGNIZED_SCHEMES: &[&str] = &["http", "https", "file", "ftp", "about", "data"];

pub const DEFAULT_SEARCH_ENGINE: &str = "https://duckduckgo.com/?q=";

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResolution {
    /// Load this URI as typed
    Navigate(String),
    /// Load the search engine with the input as query
    Search(String),
}

impl InputResolution {
    /// The URI to hand to the content view
    pub fn uri(&self) -> &str {
        match self {
            InputResolution::Navigate(uri) | InputResolution::Search(uri) => uri,
        }
    }

    pub fn into_uri(self) -> String {
        match self {
            InputResolution::Navigate(uri) | InputResolution::Search(uri) => uri,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    /// Search engine prefix; a `%s` placeholder is substituted when present
    search_template: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_ENGINE.to_string(),
        }
    }

    pub fn with_search_engine(template: String) -> Self {
        Self {
            search_template: template,
        }
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    /// Resolve user input into a URI. Blank input resolves to nothing.
    pub fn resolve(&self, input: &str) -> Option<InputResolution> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if Self::has_recognized_scheme(input) && Url::parse(input).is_ok() {
            return Some(InputResolution::Navigate(input.to_string()));
        }

        Some(InputResolution::Search(self.build_search_url(input)))
    }

    /// Accept only absolute URIs with a recognized scheme
    pub fn require_absolute(input: &str) -> Result<String> {
        let input = input.trim();
        if !Self::has_recognized_scheme(input) {
            return Err(NavigationError::InvalidUrl(format!(
                "{} has no recognized scheme",
                input
            )));
        }

        Url::parse(input)
            .map(|_| input.to_string())
            .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", input, e)))
    }

    /// Heuristic: does the input start with `<scheme>:` for a known scheme
    pub fn has_recognized_scheme(input: &str) -> bool {
        let Some((scheme, _)) = input.split_once(':') else {
            return false;
        };

        let scheme = scheme.to_ascii_lowercase();
        RECOGNIZED_SCHEMES.contains(&scheme.as_str())
    }

    fn build_search_url(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        if self.search_template.contains("%s") {
            self.search_template.replace("%s", &encoded)
        } else {
            format!("{}{}", self.search_template, encoded)
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_uri_loads_verbatim() {
        let resolver = InputResolver::new();

        assert_eq!(
            resolver.resolve("https://openai.com"),
            Some(InputResolution::Navigate("https://openai.com".to_string()))
        );
        assert_eq!(
            resolver.resolve("  about:blank "),
            Some(InputResolution::Navigate("about:blank".to_string()))
        );
        assert_eq!(
            resolver.resolve("HTTP://Example.com/a?b=c"),
            Some(InputResolution::Navigate("HTTP://Example.com/a?b=c".to_string()))
        );
    }

    #[test]
    fn test_bare_domain_is_searched() {
        let resolver = InputResolver::new();

        match resolver.resolve("openai.com") {
            Some(InputResolution::Search(url)) => {
                assert_eq!(url, format!("{}openai.com", DEFAULT_SEARCH_ENGINE))
            }
            other => panic!("Expected Search, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_scheme_is_searched() {
        let resolver = InputResolver::new();

        // Looks like scheme:port but localhost is not a recognized scheme
        assert!(matches!(
            resolver.resolve("localhost:8080"),
            Some(InputResolution::Search(_))
        ));
        assert!(matches!(
            resolver.resolve("javascript:alert(1)"),
            Some(InputResolution::Search(_))
        ));
    }

    #[test]
    fn test_query_is_encoded() {
        let resolver = InputResolver::new();

        let resolved = resolver.resolve("rust async & tokio").unwrap();
        assert_eq!(
            resolved.uri(),
            "https://duckduckgo.com/?q=rust+async+%26+tokio"
        );
    }

    #[test]
    fn test_placeholder_template() {
        let resolver =
            InputResolver::with_search_engine("https://search.example/find?q=%s&safe=1".to_string());

        assert_eq!(
            resolver.resolve("tabs").unwrap().into_uri(),
            "https://search.example/find?q=tabs&safe=1"
        );
    }

    #[test]
    fn test_blank_input() {
        let resolver = InputResolver::new();
        assert!(resolver.resolve("").is_none());
        assert!(resolver.resolve("   ").is_none());
    }

    #[test]
    fn test_require_absolute() {
        assert!(InputResolver::require_absolute("https://lite.duckduckgo.com").is_ok());
        assert!(InputResolver::require_absolute("lite.duckduckgo.com").is_err());
        assert!(InputResolver::require_absolute("https://").is_err());
    }
}
