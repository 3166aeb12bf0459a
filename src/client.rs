//! Cloud lookup client for the cluster-management API.

use std::collections::HashMap;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::cloud::CloudLookup;
use crate::defaults::DEFAULT_ANYSCALE_HOST;
use crate::utils::RuntimeConfigError;

const PAGE_SIZE: u32 = 50;

/// Blocking client resolving cloud names to ids.
pub struct CloudClient {
    host: String,
    token: Option<String>,
    client: Client,
}

#[derive(Serialize)]
struct SearchCloudsQuery<'a> {
    name: NameFilter<'a>,
    paging: Paging<'a>,
}

#[derive(Serialize)]
struct NameFilter<'a> {
    equals: &'a str,
}

#[derive(Serialize)]
struct Paging<'a> {
    count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    paging_token: Option<&'a str>,
}

#[derive(Deserialize)]
struct CloudListResponse {
    results: Vec<CloudSummary>,
    #[serde(default)]
    metadata: ListMetadata,
}

#[derive(Deserialize)]
struct CloudSummary {
    id: String,
    name: String,
}

#[derive(Deserialize, Default)]
struct ListMetadata {
    next_paging_token: Option<String>,
}

impl CloudClient {
    /// Create a client for `host`, authenticating with `token` when given.
    pub fn new(host: &str, token: Option<&str>) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
            client: Client::new(),
        }
    }

    /// Create a client from `ANYSCALE_HOST` and `ANYSCALE_CLI_TOKEN`.
    pub fn from_env() -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_env_map(&env)
    }

    /// Create a client from a provided env map.
    pub fn from_env_map(env: &HashMap<String, String>) -> Self {
        let host = env
            .get("ANYSCALE_HOST")
            .map(String::as_str)
            .unwrap_or(DEFAULT_ANYSCALE_HOST);
        Self::new(host, env.get("ANYSCALE_CLI_TOKEN").map(String::as_str))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn search_page(&self, name: &str, paging_token: Option<&str>) -> Result<CloudListResponse, reqwest::Error> {
        let query = SearchCloudsQuery {
            name: NameFilter { equals: name },
            paging: Paging {
                count: PAGE_SIZE,
                paging_token,
            },
        };

        let mut request = self
            .client
            .post(format!("{}/api/v2/clouds/search", self.host))
            .json(&query);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        request.send()?.error_for_status()?.json()
    }
}

impl CloudLookup for CloudClient {
    /// Walk the search results page by page until a cloud with exactly this name turns up.
    fn find_cloud_by_name(&self, name: &str) -> Result<Option<String>, RuntimeConfigError> {
        let mut paging_token: Option<String> = None;
        loop {
            let page = self
                .search_page(name, paging_token.as_deref())
                .map_err(|e| RuntimeConfigError::LookupFailed {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;

            if let Some(cloud) = page.results.into_iter().find(|cloud| cloud.name == name) {
                tracing::debug!(cloud_name = name, cloud_id = %cloud.id, "resolved cloud by name");
                return Ok(Some(cloud.id));
            }

            match page.metadata.next_paging_token {
                Some(token) if Some(&token) != paging_token.as_ref() => paging_token = Some(token),
                _ => return Ok(None),
            }
        }
    }
}
