//! # GitLab Forge Adapter
//!
//! Implements the `Forge`/`ForgeSession` traits over the GitLab REST API v4
//! using `reqwest`. Authentication doubles as the identity lookup: opening a
//! session probes `/user`, and the resulting identity is cached on the
//! session so a cycle costs exactly one call per listing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::config::GitLabConfig;
use crate::domain::traits::{Forge, ForgeError, ForgeSession};
use crate::domain::types::{Commit, Identity, Issue, Project};

pub struct GitLabForge {
    client: reqwest::Client,
    base_url: String,
}

impl GitLabForge {
    pub fn new(config: &GitLabConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Forge for GitLabForge {
    async fn open_session(&self, credential: &str) -> Result<Box<dyn ForgeSession>, ForgeError> {
        let user: GitLabUser = get_json(
            &self.client,
            &self.base_url,
            credential,
            "/user",
            &[],
        )
        .await?;

        Ok(Box::new(GitLabSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: credential.to_string(),
            identity: Identity {
                name: user.name,
                email: user.email.unwrap_or_default(),
            },
        }))
    }
}

#[derive(Debug)]
pub struct GitLabSession {
    client: reqwest::Client,
    base_url: String,
    token: String,
    identity: Identity,
}

#[async_trait]
impl ForgeSession for GitLabSession {
    async fn current_identity(&self) -> Result<Identity, ForgeError> {
        Ok(self.identity.clone())
    }

    async fn starred_projects(&self) -> Result<Vec<Project>, ForgeError> {
        let projects: Vec<GitLabProject> = self
            .get(
                "/projects",
                &[("starred", "true".into()), ("per_page", "100".into())],
            )
            .await?;
        Ok(projects.into_iter().map(Into::into).collect())
    }

    async fn commits_since(
        &self,
        project_id: u64,
        since: DateTime<Utc>,
    ) -> Result<Vec<Commit>, ForgeError> {
        let commits: Vec<GitLabCommit> = self
            .get(
                &format!("/projects/{project_id}/repository/commits"),
                &[("since", since.to_rfc3339())],
            )
            .await?;
        Ok(commits.into_iter().map(Into::into).collect())
    }

    async fn issues_created_after(
        &self,
        project_id: u64,
        after: DateTime<Utc>,
    ) -> Result<Vec<Issue>, ForgeError> {
        let issues: Vec<GitLabIssue> = self
            .get(
                &format!("/projects/{project_id}/issues"),
                &[
                    ("created_after", after.to_rfc3339()),
                    ("per_page", "100".into()),
                ],
            )
            .await?;
        Ok(issues.into_iter().map(Into::into).collect())
    }
}

impl GitLabSession {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ForgeError> {
        get_json(&self.client, &self.base_url, &self.token, path, query).await
    }
}

async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    path: &str,
    query: &[(&str, String)],
) -> Result<T, ForgeError> {
    let url = format!("{base_url}/api/v4{path}");
    let response = client
        .get(&url)
        .header("PRIVATE-TOKEN", token)
        .query(query)
        .send()
        .await
        .map_err(|e| ForgeError::Remote(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ForgeError::Auth(status.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ForgeError::Remote(format!("{status}: {body}")));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ForgeError::Remote(e.to_string()))
}

// -- Wire models --

#[derive(Debug, Deserialize)]
struct GitLabUser {
    name: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitLabProject {
    id: u64,
    name: String,
    web_url: String,
}

impl From<GitLabProject> for Project {
    fn from(p: GitLabProject) -> Self {
        Project {
            id: p.id,
            name: p.name,
            web_url: p.web_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabCommit {
    title: String,
    author_name: String,
    #[serde(default)]
    author_email: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    message: String,
    web_url: String,
}

impl From<GitLabCommit> for Commit {
    fn from(c: GitLabCommit) -> Self {
        Commit {
            title: c.title,
            author_name: c.author_name,
            author_email: c.author_email,
            created_at: c.created_at,
            message: c.message,
            web_url: c.web_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabIssue {
    title: String,
    author: GitLabIssueAuthor,
    created_at: DateTime<Utc>,
    #[serde(default)]
    description: Option<String>,
    web_url: String,
}

#[derive(Debug, Deserialize)]
struct GitLabIssueAuthor {
    name: String,
}

impl From<GitLabIssue> for Issue {
    fn from(i: GitLabIssue) -> Self {
        Issue {
            title: i.title,
            author_name: i.author.name,
            created_at: i.created_at,
            description: i.description.unwrap_or_default(),
            web_url: i.web_url,
        }
    }
}
