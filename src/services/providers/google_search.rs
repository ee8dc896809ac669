/// Google Custom Search JSON API provider
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{web_search::CustomSearchResponse, SearchHit},
    services::providers::WebSearchProvider,
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct GoogleSearchClient {
    http_client: HttpClient,
    api_key: String,
    engine_id: String,
    search_url: String,
    cache: Cache,
}

impl GoogleSearchClient {
    pub fn new(cache: Cache, api_key: String, engine_id: String, search_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            engine_id,
            search_url,
            cache,
        }
    }

    async fn fetch(&self, query: &str, num: u8) -> AppResult<Vec<SearchHit>> {
        let num_param = num.to_string();
        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num_param.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Custom Search API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let search: CustomSearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, query = %query, "Failed to deserialize search response");
            AppError::ExternalApi(format!("Failed to parse search response: {}", e))
        })?;

        let hits: Vec<SearchHit> = search
            .items
            .into_iter()
            .take(num as usize)
            .map(SearchHit::from)
            .collect();

        tracing::info!(
            query = %query,
            results = hits.len(),
            provider = "google",
            "Web search completed"
        );

        Ok(hits)
    }
}

#[async_trait::async_trait]
impl WebSearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str, num: u8) -> AppResult<Vec<SearchHit>> {
        cached!(
            self.cache,
            CacheKey::WebSearch(format!("{}:{}", num, query)),
            SEARCH_CACHE_TTL,
            self.fetch(query, num)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;
    use mockito::Matcher;

    fn create_test_client(search_url: String) -> GoogleSearchClient {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client);
        GoogleSearchClient::new(cache, "test_key".to_string(), "test_cx".to_string(), search_url)
    }

    #[tokio::test]
    async fn test_search_sends_query_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test_key".into()),
                Matcher::UrlEncoded("cx".into(), "test_cx".into()),
                Matcher::UrlEncoded("q".into(), "top drama, comedy movies".into()),
                Matcher::UrlEncoded("num".into(), "3".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{ "items": [
                    { "title": "Best dramedies", "snippet": "Ranked", "link": "https://a.example" },
                    { "title": "Feel-good films", "snippet": "List" }
                ] }"#,
            )
            .create_async()
            .await;

        let client = create_test_client(format!("{}/customsearch/v1", server.url()));
        let hits = client.search("top drama, comedy movies", 3).await.unwrap();

        mock.assert_async().await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Best dramedies");
        assert_eq!(hits[1].link, None);
    }

    #[tokio::test]
    async fn test_search_without_items_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{ "searchInformation": { "totalResults": "0" } }"#)
            .create_async()
            .await;

        let client = create_test_client(format!("{}/customsearch/v1", server.url()));
        assert!(client.search("nothing", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quota_error_is_external_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{ "error": { "message": "Quota exceeded" } }"#)
            .create_async()
            .await;

        let client = create_test_client(format!("{}/customsearch/v1", server.url()));
        match client.search("anything", 3).await {
            Err(AppError::ExternalApi(msg)) => assert!(msg.contains("429")),
            other => panic!("expected ExternalApi error, got {:?}", other),
        }
    }
}
