//! Customer profile snapshot.

use crate::checkout::Address;
use crate::ids::CustomerId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// The signed-in customer, as returned by OTP verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_spent: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_date: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Default address, else the first one on file.
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_default == Some(true))
            .or_else(|| self.addresses.first())
    }

    /// Email if present and non-blank.
    pub fn contact_email(&self) -> Option<&str> {
        Some(self.email.as_str()).filter(|e| !e.trim().is_empty())
    }
}
