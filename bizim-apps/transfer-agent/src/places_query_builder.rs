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

//! # Places Query Builder
//!
//! Side-effect free validation for place search and place details lookups,
//! plus the language codes shared by every endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, require};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
    De,
    Ru,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Tr, Language::De, Language::Ru];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
            Language::De => "de",
            Language::Ru => "ru",
        }
    }

    /// Parse a caller-supplied code, reporting failures against `field`.
    pub fn parse_field(code: &str, field: &'static str) -> Result<Self, ValidationError> {
        code.parse().map_err(|_| {
            ValidationError::new(
                field,
                format!("unsupported language '{code}', expected one of en, tr, de, ru"),
            )
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "tr" => Ok(Language::Tr),
            "de" => Ok(Language::De),
            "ru" => Ok(Language::Ru),
            _ => Err(()),
        }
    }
}

pub(crate) fn default_language() -> String {
    Language::En.code().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct PlaceSearchParams {
    /// Free text such as a hotel name, airport or city
    pub query: String,
    /// Response language: en, tr, de or ru
    #[serde(default = "default_language")]
    pub language: String,
}

impl PlaceSearchParams {
    pub fn new(query: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: language.into(),
        }
    }

    pub fn validate(&self) -> Result<Language, ValidationError> {
        require(!self.query.trim().is_empty(), "query", || {
            "search query is required".to_string()
        })?;
        Language::parse_field(&self.language, "language")
    }

    /// Query string pairs, in upstream order.
    pub(crate) fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, ValidationError> {
        let language = self.validate()?;
        Ok(vec![
            ("query", self.query.trim().to_string()),
            ("language", language.code().to_string()),
        ])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct PlaceDetailsParams {
    /// Identifier returned by `search_places`
    pub place_id: String,
    /// Response language: en, tr, de or ru
    #[serde(default = "default_language")]
    pub language: String,
}

impl PlaceDetailsParams {
    pub fn new(place_id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            language: language.into(),
        }
    }

    pub fn validate(&self) -> Result<Language, ValidationError> {
        require(!self.place_id.trim().is_empty(), "place_id", || {
            "place ID is required".to_string()
        })?;
        Language::parse_field(&self.language, "language")
    }

    pub(crate) fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, ValidationError> {
        let language = self.validate()?;
        Ok(vec![
            ("place_id", self.place_id.trim().to_string()),
            ("language", language.code().to_string()),
        ])
    }
}
