use serde::{Deserialize, Serialize};

// ============================================================================
// Google Custom Search API Types
// ============================================================================

/// Raw response from the Custom Search JSON API; `items` is absent when
/// nothing matched
#[derive(Debug, Clone, Deserialize)]
pub struct CustomSearchResponse {
    #[serde(default)]
    pub items: Vec<CustomSearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomSearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// A web search result as used by the application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: Option<String>,
}

impl From<CustomSearchItem> for SearchHit {
    fn from(item: CustomSearchItem) -> Self {
        Self {
            title: item.title,
            snippet: item.snippet,
            link: item.link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_without_items() {
        let response: CustomSearchResponse =
            serde_json::from_str(r#"{ "kind": "customsearch#search" }"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_item_to_hit() {
        let item: CustomSearchItem = serde_json::from_str(
            r#"{ "title": "Best action movies", "snippet": "A list", "link": "https://example.com" }"#,
        )
        .unwrap();
        let hit = SearchHit::from(item);
        assert_eq!(hit.title, "Best action movies");
        assert_eq!(hit.link.as_deref(), Some("https://example.com"));
    }
}
