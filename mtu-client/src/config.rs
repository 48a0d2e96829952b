use anyhow::Context;

use crate::api::{AuthToken, Uuid};

pub const HOST_VAR: &str = "MTU_API_HOST";
pub const TOKEN_VAR: &str = "MTU_AUTH_TOKEN";

/// Where the site's API lives, and who we are to it
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ClientConfig {
    pub host: String,
    pub token: Option<AuthToken>,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, token: Option<AuthToken>) -> ClientConfig {
        ClientConfig {
            host: host.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_env() -> anyhow::Result<ClientConfig> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_VAR)
            .with_context(|| format!("retrieving {HOST_VAR} environment variable"))?;
        let token = match lookup(TOKEN_VAR) {
            None => None,
            Some(tok) if tok.trim().is_empty() => None,
            Some(tok) => Some(AuthToken(
                Uuid::try_parse(tok.trim())
                    .with_context(|| format!("parsing {TOKEN_VAR} as an auth token"))?,
            )),
        };
        Ok(ClientConfig::new(host, token))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.host, path)
    }
}
