//! Web search tool

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Results of one search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<String>,
    pub sources: Vec<String>,
}

/// Searches the web for material on a query
#[async_trait]
pub trait SearchTool: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults>;

    fn name(&self) -> &str {
        "web_search"
    }
}

/// Canned search results; no network access
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSearch;

#[async_trait]
impl SearchTool for MockSearch {
    async fn search(&self, query: &str) -> Result<SearchResults> {
        Ok(SearchResults {
            query: query.to_string(),
            results: vec![
                format!("Research finding about {} from source 1", query),
                format!("Additional information on {} from source 2", query),
                format!("Expert analysis of {} from source 3", query),
            ],
            sources: vec![
                "source1.com".to_string(),
                "source2.org".to_string(),
                "source3.edu".to_string(),
            ],
        })
    }
}
