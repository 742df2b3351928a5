//! GitHub organization listing over the REST API.

use serde::Deserialize;
use tracing::debug;

use crate::core::{Error, Result};

const API_BASE: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("repolens/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct OrgRepo {
    clone_url: String,
    archived: bool,
}

/// List clone URLs for every non-archived repository of an organization.
///
/// Pages through the API until a short page; `max_repos` caps the result.
pub fn list_organization_repos(
    organization: &str,
    token: Option<&str>,
    max_repos: Option<usize>,
) -> Result<Vec<String>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Remote(format!("Failed to build HTTP client: {e}")))?;

    let mut urls = Vec::new();
    let mut page = 1;

    loop {
        let url = format!(
            "{API_BASE}/orgs/{organization}/repos?per_page={PER_PAGE}&page={page}&type=all"
        );
        debug!(%url, "fetching organization page");

        let mut request = client.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| Error::Remote(format!("GitHub API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote(match status.as_u16() {
                401 => "GitHub API: bad credentials (check the token)".to_string(),
                403 => "GitHub API: rate limited or forbidden".to_string(),
                404 => format!("GitHub API: organization '{organization}' not found"),
                code => format!("GitHub API returned status {code}"),
            }));
        }

        let repos: Vec<OrgRepo> = response
            .json()
            .map_err(|e| Error::Remote(format!("GitHub API returned invalid JSON: {e}")))?;
        let page_len = repos.len();

        for repo in repos {
            if repo.archived {
                continue;
            }
            urls.push(repo.clone_url);
            if let Some(max) = max_repos {
                if urls.len() >= max {
                    return Ok(urls);
                }
            }
        }

        if page_len < PER_PAGE {
            break;
        }
        page += 1;
    }

    Ok(urls)
}
