//! Core address types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured postal address.
///
/// Every field is a plain string; a missing value is the empty string.
/// Equality is exact and field-wise, so `"Main St"` and `"main st"` differ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code (e.g. "US", "DE")
    pub country_code: String,
    pub administrative_area: String,
    pub locality: String,
    pub postal_code: String,
    pub address_line1: String,
    pub address_line2: String,
    pub address_line3: String,
}

/// One structured field of an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    CountryCode,
    AdministrativeArea,
    Locality,
    PostalCode,
    AddressLine1,
    AddressLine2,
    AddressLine3,
}

/// The fields a form shows for editing, in display order. The country is
/// chosen separately and is never refilled from a saved location.
pub const DISPLAY_FIELDS: [AddressField; 6] = [
    AddressField::AdministrativeArea,
    AddressField::Locality,
    AddressField::PostalCode,
    AddressField::AddressLine1,
    AddressField::AddressLine2,
    AddressField::AddressLine3,
];

impl AddressField {
    pub const ALL: [AddressField; 7] = [
        Self::CountryCode,
        Self::AdministrativeArea,
        Self::Locality,
        Self::PostalCode,
        Self::AddressLine1,
        Self::AddressLine2,
        Self::AddressLine3,
    ];

    /// Form/storage key, e.g. `administrative_area`.
    pub fn key(self) -> &'static str {
        match self {
            Self::CountryCode => "country_code",
            Self::AdministrativeArea => "administrative_area",
            Self::Locality => "locality",
            Self::PostalCode => "postal_code",
            Self::AddressLine1 => "address_line1",
            Self::AddressLine2 => "address_line2",
            Self::AddressLine3 => "address_line3",
        }
    }

    /// Name used for `%placeholder` tokens in format templates.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::CountryCode => "countryCode",
            Self::AdministrativeArea => "administrativeArea",
            Self::Locality => "locality",
            Self::PostalCode => "postalCode",
            Self::AddressLine1 => "addressLine1",
            Self::AddressLine2 => "addressLine2",
            Self::AddressLine3 => "addressLine3",
        }
    }

    pub fn from_placeholder(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.placeholder() == name)
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Address {
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::CountryCode => &self.country_code,
            AddressField::AdministrativeArea => &self.administrative_area,
            AddressField::Locality => &self.locality,
            AddressField::PostalCode => &self.postal_code,
            AddressField::AddressLine1 => &self.address_line1,
            AddressField::AddressLine2 => &self.address_line2,
            AddressField::AddressLine3 => &self.address_line3,
        }
    }

    /// Number of structured fields holding a non-empty value.
    pub fn filled_count(&self) -> usize {
        AddressField::ALL
            .into_iter()
            .filter(|&f| !self.get(f).is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}
