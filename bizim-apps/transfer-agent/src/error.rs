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

//! # Client Errors
//!
//! Every client call ends in exactly one of three failure kinds: the caller's
//! input was rejected locally, the upstream API refused the request, or the
//! exchange itself broke down.

use thiserror::Error;

/// Malformed or missing caller input, detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    field: &'static str,
    reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending input field, as it appears in the tool schema.
    pub fn field(&self) -> &'static str {
        self.field
    }
}

/// Ensure `cond`, or fail validation of `field`.
pub(crate) fn require(
    cond: bool,
    field: &'static str,
    reason: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if cond {
        Ok(())
    } else {
        Err(ValidationError::new(field, reason()))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] wreq::Error),
    #[error("HTTP error {status}: {body_preview}")]
    Status { status: u16, body_preview: String },
    #[error("response is not valid JSON: {source}; body: {body_preview}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body_preview: String,
    },
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The upstream answered with an explicit error. `message` is its own text.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<wreq::Error> for ClientError {
    fn from(e: wreq::Error) -> Self {
        ClientError::Transport(TransportError::Http(e))
    }
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, ClientError::Upstream { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ClientError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// First `max` characters of a response body, for error messages and logs.
pub(crate) fn preview(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}
