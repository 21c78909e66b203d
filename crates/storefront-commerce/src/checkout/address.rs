//! Address types.

use serde::{Deserialize, Serialize};

/// A postal address as stored on a customer profile.
///
/// Every field is optional on the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl Address {
    /// Format as single line, skipping missing parts.
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Check if no part of the address is filled in.
    pub fn is_empty(&self) -> bool {
        self.one_line().is_empty()
    }

    /// Copy without the profile-only `isDefault` flag, as sent with orders.
    pub fn for_delivery(&self) -> Self {
        Self {
            is_default: None,
            ..self.clone()
        }
    }
}
