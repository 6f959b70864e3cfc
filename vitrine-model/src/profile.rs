//! Profile records: the editable draft and the last persisted snapshot.

use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Closed set of editable profile fields.
///
/// Field edits are keyed by this enumeration rather than by free-form
/// strings, so an edit can only ever touch a field that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ProfileField {
    Name,
    Email,
    AddressLine,
    City,
    State,
    Country,
    Zip,
    Phone,
    AddressType,
}

impl ProfileField {
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Email,
        Self::AddressLine,
        Self::City,
        Self::State,
        Self::Country,
        Self::Zip,
        Self::Phone,
        Self::AddressType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::AddressLine => "addressLine",
            Self::City => "city",
            Self::State => "state",
            Self::Country => "country",
            Self::Zip => "zip",
            Self::Phone => "phone",
            Self::AddressType => "addressType",
        }
    }

    /// Human readable label used in notices and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email Address",
            Self::AddressLine => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::Country => "Country",
            Self::Zip => "Zip Code",
            Self::Phone => "Phone",
            Self::AddressType => "Address Type",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "addressline" | "addressline1" | "address" => Ok(Self::AddressLine),
            "city" => Ok(Self::City),
            "state" => Ok(Self::State),
            "country" => Ok(Self::Country),
            "zip" | "zipcode" => Ok(Self::Zip),
            "phone" => Ok(Self::Phone),
            "addresstype" | "type" => Ok(Self::AddressType),
            _ => Err(ModelError::UnknownField(raw.to_string())),
        }
    }
}

/// Mutable working copy of the profile while the editor is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub phone: String,
    pub address_type: String,
}

impl ProfileDraft {
    /// Seed a draft from the last persisted profile.
    pub fn from_remote(remote: &RemoteProfile) -> Self {
        Self {
            name: remote.name.clone(),
            email: remote.email.clone(),
            address_line: remote.address.address_line1.clone(),
            city: remote.address.city.clone(),
            state: remote.address.state.clone(),
            country: remote.address.country.clone(),
            zip: remote.address.zip.clone(),
            phone: remote.phone.clone(),
            address_type: remote.address.kind.clone(),
        }
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Email => &self.email,
            ProfileField::AddressLine => &self.address_line,
            ProfileField::City => &self.city,
            ProfileField::State => &self.state,
            ProfileField::Country => &self.country,
            ProfileField::Zip => &self.zip,
            ProfileField::Phone => &self.phone,
            ProfileField::AddressType => &self.address_type,
        }
    }

    /// Replace a single field, leaving every other field untouched.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Email => &mut self.email,
            ProfileField::AddressLine => &mut self.address_line,
            ProfileField::City => &mut self.city,
            ProfileField::State => &mut self.state,
            ProfileField::Country => &mut self.country,
            ProfileField::Zip => &mut self.zip,
            ProfileField::Phone => &mut self.phone,
            ProfileField::AddressType => &mut self.address_type,
        };
        *slot = value.into();
    }

    /// Finalize the draft into the shape that gets persisted and published.
    pub fn to_remote(&self, image: Option<String>) -> RemoteProfile {
        RemoteProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: Address {
                kind: self.address_type.clone(),
                address_line1: self.address_line.clone(),
                city: self.city.clone(),
                state: self.state.clone(),
                country: self.country.clone(),
                zip: self.zip.clone(),
            },
            image,
        }
    }
}

/// Postal address sub-record of a persisted profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    /// Address category as reported by the server (`type` on the wire).
    pub kind: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}

/// Last known server-persisted profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    /// Opaque server-owned image path or URL.
    pub image: Option<String>,
}
