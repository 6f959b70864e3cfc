//! JSON records exchanged with the profile service.

use serde::{Deserialize, Deserializer, Serialize};

use crate::profile::{Address, RemoteProfile};

/// Body of `GET user/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchProfileResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub profile: Option<WireProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub phone: Option<String>,
    /// Server-relative image path.
    #[serde(default, rename = "profile")]
    pub image: Option<String>,
    #[serde(default)]
    pub address: Option<WireAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireAddress {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "addressLine1")]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub zip: Option<String>,
}

impl From<WireProfile> for RemoteProfile {
    fn from(wire: WireProfile) -> Self {
        let address = wire.address.unwrap_or_default();
        Self {
            name: wire.name.unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            phone: wire.phone.unwrap_or_default(),
            address: Address {
                kind: address.kind.unwrap_or_default(),
                address_line1: address.address_line1.unwrap_or_default(),
                city: address.city.unwrap_or_default(),
                state: address.state.unwrap_or_default(),
                country: address.country.unwrap_or_default(),
                zip: address.zip.unwrap_or_default(),
            },
            image: wire.image.filter(|path| !path.trim().is_empty()),
        }
    }
}

/// Body of `POST app/upload-image`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadImageResponse {
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}

/// Body of `POST auth/set-profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistProfileRequest {
    pub name: String,
    pub email: String,
    pub address: PersistAddress,
    /// Newly uploaded image URL, or the previously persisted path.
    pub profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistAddress {
    pub country: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "addressLine1")]
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl From<&RemoteProfile> for PersistProfileRequest {
    fn from(profile: &RemoteProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            address: PersistAddress {
                country: profile.address.country.clone(),
                kind: profile.address.kind.clone(),
                address_line1: profile.address.address_line1.clone(),
                city: profile.address.city.clone(),
                state: profile.address.state.clone(),
                zip: profile.address.zip.clone(),
            },
            profile: profile.image.clone(),
        }
    }
}

// Zip and phone have been observed as JSON numbers as well as strings.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|value| match value {
        Loose::Text(text) => text,
        Loose::Int(n) => n.to_string(),
        Loose::Float(n) => n.to_string(),
    }))
}
