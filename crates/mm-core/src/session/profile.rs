//! Backend user profile.

use serde::{Deserialize, Deserializer, Serialize};

/// Referral state attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Referral {
    #[serde(default)]
    pub is_active: bool,
}

/// Profile returned by `GET /user/me`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub has_macros: bool,
    #[serde(default)]
    pub is_pro: bool,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    /// Decimal feet or centimetres, see `height_unit_preference`.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub height_unit_preference: Option<String>,
    #[serde(default)]
    pub referral: Option<Referral>,
}

impl UserProfile {
    /// Pro users and users with an active referral never see the paywall.
    pub fn should_skip_paywall(&self) -> bool {
        self.is_pro || self.referral.as_ref().is_some_and(|r| r.is_active)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
