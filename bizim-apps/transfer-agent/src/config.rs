//!  Bizim Transfer Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Upstream Configuration
//!
//! Base URL, credential and timeout for the Bizim Transfer API. Built once at
//! startup and handed to the client; nothing here is read lazily.

use anyhow::{Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};

pub const DEFAULT_BASE_URL: &str = "http://test-api.bizimtransfer.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the static credential travels with each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamAuth {
    Basic { username: String, password: String },
    Bearer { token: String },
    Header { name: String, value: String },
    Query { name: String, value: String },
}

impl UpstreamAuth {
    /// `(name, value)` of the header this scheme adds, if any.
    pub fn header(&self) -> Option<(String, String)> {
        match self {
            UpstreamAuth::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                Some(("Authorization".to_string(), format!("Basic {encoded}")))
            }
            UpstreamAuth::Bearer { token } => {
                Some(("Authorization".to_string(), format!("Bearer {token}")))
            }
            UpstreamAuth::Header { name, value } => Some((name.clone(), value.clone())),
            UpstreamAuth::Query { .. } => None,
        }
    }

    /// `(name, value)` of the query parameter this scheme adds, if any.
    pub fn query_param(&self) -> Option<(&str, &str)> {
        match self {
            UpstreamAuth::Query { name, value } => Some((name, value)),
            _ => None,
        }
    }

    pub fn scheme_name(&self) -> &'static str {
        match self {
            UpstreamAuth::Basic { .. } => "basic",
            UpstreamAuth::Bearer { .. } => "bearer",
            UpstreamAuth::Header { .. } => "header",
            UpstreamAuth::Query { .. } => "query",
        }
    }
}

impl Default for UpstreamAuth {
    fn default() -> Self {
        UpstreamAuth::Basic {
            username: "test".to_string(),
            password: "test".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub auth: UpstreamAuth,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: UpstreamAuth::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, auth: UpstreamAuth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            ..Default::default()
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// `base_url` joined with an endpoint path, without doubled slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Upstream settings shared by every binary; each flag falls back to an
/// environment variable.
#[cfg(any(feature = "cli", feature = "mcp"))]
#[derive(clap::Args, Debug, Clone)]
pub struct UpstreamArgs {
    #[arg(long, env = "BIZIM_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Credential scheme: basic, bearer, header or query
    #[arg(long, env = "BIZIM_API_AUTH", default_value = "basic")]
    pub api_auth: String,

    #[arg(long, env = "BIZIM_API_USERNAME", default_value = "test")]
    pub api_username: String,

    #[arg(long, env = "BIZIM_API_PASSWORD", default_value = "test", hide_env_values = true)]
    pub api_password: String,

    /// Token for bearer, header and query schemes
    #[arg(long, env = "BIZIM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Header or query parameter name carrying the key
    #[arg(long, env = "BIZIM_API_KEY_NAME")]
    pub api_key_name: Option<String>,

    #[arg(long, env = "BIZIM_API_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub api_timeout: u64,
}

#[cfg(any(feature = "cli", feature = "mcp"))]
impl UpstreamArgs {
    pub fn into_config(self) -> Result<UpstreamConfig> {
        let auth = parse_auth(
            &self.api_auth,
            self.api_username,
            self.api_password,
            self.api_key,
            self.api_key_name,
        )?;
        Ok(UpstreamConfig::new(self.api_base_url, auth).timeout_secs(self.api_timeout))
    }
}

/// Build an [`UpstreamAuth`] from its textual scheme name and raw settings.
pub fn parse_auth(
    scheme: &str,
    username: String,
    password: String,
    key: Option<String>,
    key_name: Option<String>,
) -> Result<UpstreamAuth> {
    let scheme = scheme.trim().to_lowercase();
    if scheme == "basic" {
        return Ok(UpstreamAuth::Basic { username, password });
    }
    let Some(value) = key.filter(|k| !k.is_empty()) else {
        bail!("API key is required for the '{}' auth scheme", scheme);
    };
    match scheme.as_str() {
        "bearer" => Ok(UpstreamAuth::Bearer { token: value }),
        "header" => Ok(UpstreamAuth::Header {
            name: key_name.unwrap_or_else(|| "X-Api-Key".to_string()),
            value,
        }),
        "query" => Ok(UpstreamAuth::Query {
            name: key_name.unwrap_or_else(|| "api_key".to_string()),
            value,
        }),
        other => bail!(
            "Unknown auth scheme '{}'. Expected basic, bearer, header or query",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_is_base64() {
        let auth = UpstreamAuth::default();
        let (name, value) = auth.header().unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Basic dGVzdDp0ZXN0");
    }

    #[test]
    fn query_scheme_adds_no_header() {
        let auth = parse_auth(
            "query",
            String::new(),
            String::new(),
            Some("k3y".into()),
            None,
        )
        .unwrap();
        assert!(auth.header().is_none());
        assert_eq!(auth.query_param(), Some(("api_key", "k3y")));
    }

    #[test]
    fn keyed_schemes_need_a_key() {
        assert!(parse_auth("bearer", String::new(), String::new(), None, None).is_err());
        assert!(parse_auth("digest", String::new(), String::new(), Some("x".into()), None).is_err());
    }

    #[test]
    fn endpoint_joins_cleanly() {
        let config = UpstreamConfig::new("http://localhost:9000/", UpstreamAuth::default());
        assert_eq!(config.endpoint("/places"), "http://localhost:9000/places");
        assert_eq!(config.endpoint("query"), "http://localhost:9000/query");
    }
}
