use crate::error::{ReportError, Result};
use std::env;
use std::fmt;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub const SETUP_INSTRUCTIONS: &str = "\
Please configure your GitHub Personal Access Token and Username

Steps:
1. Copy the .env.example file to .env
2. Go to https://github.com/settings/tokens
3. Click 'Generate new token (classic)'
4. Give it a name (e.g., 'Commits Fetcher')
5. Select scope: 'repo' (Full control of private repositories)
6. Click 'Generate token' and copy it
7. Edit the .env file and paste your token and username (GITHUB_TOKEN, GITHUB_USERNAME)
";

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub username: String,
    pub api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ReportError::MissingConfig(key))
        };

        let token = required("GITHUB_TOKEN")?;
        let username = required("GITHUB_USERNAME")?;
        let api_url = lookup("GITHUB_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            token,
            username,
            api_url,
        })
    }
}
