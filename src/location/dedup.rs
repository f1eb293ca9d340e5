//! Exact-match address deduplication.
//!
//! Two addresses are the same location only when every field is equal,
//! empty lines included. No case, whitespace or diacritic normalization is
//! applied, so "123 Main St" and "123 main st" are distinct locations.

use super::types::Location;
use crate::address::Address;

/// Decides whether a candidate address is already saved.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationDeduplicator;

impl LocationDeduplicator {
    /// True if any active location in `existing` has exactly `candidate` as
    /// its address. Stops at the first match.
    pub fn exists(&self, candidate: &Address, existing: &[Location]) -> bool {
        self.find_match(candidate, existing).is_some()
    }

    /// The first active location whose address equals `candidate`.
    pub fn find_match<'a>(&self, candidate: &Address, existing: &'a [Location]) -> Option<&'a Location> {
        existing
            .iter()
            .filter(|l| l.active)
            .find(|l| l.address == *candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::types::LocationId;
    use chrono::Utc;

    fn location(id: u64, address: Address, active: bool) -> Location {
        Location {
            id: LocationId(id),
            bundle: "event_location".into(),
            title: format!("loc {}", id),
            address,
            active,
            created_at: Utc::now(),
        }
    }

    fn main_st(line1: &str) -> Address {
        Address {
            country_code: "US".into(),
            administrative_area: "CA".into(),
            locality: "LA".into(),
            postal_code: "90001".into(),
            address_line1: line1.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_match() {
        let existing = vec![location(1, main_st("1 Main St"), true)];
        assert!(LocationDeduplicator.exists(&main_st("1 Main St"), &existing));
    }

    #[test]
    fn test_no_normalization() {
        let existing = vec![location(1, main_st("123 Main St"), true)];
        assert!(!LocationDeduplicator.exists(&main_st("123 main st"), &existing));
        assert!(!LocationDeduplicator.exists(&main_st("123 Main St "), &existing));
    }

    #[test]
    fn test_every_field_compared() {
        let stored = main_st("1 Main St");
        let existing = vec![location(1, stored.clone(), true)];
        let mut candidate = stored;
        candidate.address_line3 = "Rear".into();
        assert!(!LocationDeduplicator.exists(&candidate, &existing));
        candidate.address_line3.clear();
        candidate.country_code = "CA".into();
        assert!(!LocationDeduplicator.exists(&candidate, &existing));
    }

    #[test]
    fn test_inactive_ignored() {
        let existing = vec![location(1, main_st("1 Main St"), false)];
        assert!(!LocationDeduplicator.exists(&main_st("1 Main St"), &existing));
    }

    #[test]
    fn test_first_match_returned() {
        let existing = vec![
            location(1, main_st("2 Elm St"), true),
            location(2, main_st("1 Main St"), true),
            location(3, main_st("1 Main St"), true),
        ];
        let found = LocationDeduplicator.find_match(&main_st("1 Main St"), &existing).unwrap();
        assert_eq!(found.id, LocationId(2));
    }

    #[test]
    fn test_empty_existing() {
        assert!(!LocationDeduplicator.exists(&main_st("1 Main St"), &[]));
    }
}
