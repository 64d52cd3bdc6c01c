//! Rate configuration for the quote engine.
//!
//! The `rates` module owns everything the estimator looks up rather
//! than computes: per-destination freight and customs duty rates, the
//! fixed per-kilogram and flat charges, and the markup applied to the
//! suggested price.  Destination rates live in [`RateCard`] values
//! collected into a [`RateSchedule`]; cards may be loaded from
//! versioned JSON files so that rates can be updated and tested
//! without touching the calculation logic.  A destination without a
//! card is priced with the documented default rates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Insurance charged as a fraction of product value (0.2%).
pub const INSURANCE_RATE: f64 = 0.002;
/// Port charges per kilogram of shipment weight.
pub const PORT_CHARGE_PER_KG: f64 = 25.0;
/// Handling charges per kilogram of shipment weight.
pub const HANDLING_CHARGE_PER_KG: f64 = 50.0;
/// Flat documentation fee applied to every quote.
pub const DOCUMENTATION_FEE: f64 = 5000.0;
/// Suggested price is total cost marked up by this factor (15%).
pub const PRICE_MARKUP: f64 = 1.15;

/// Freight rate per kilogram for destinations without a rate card.
pub const DEFAULT_FREIGHT_PER_KG: f64 = 100.0;
/// Customs duty fraction for destinations without a rate card.
pub const DEFAULT_DUTY_RATE: f64 = 0.10;

/// Built-in rates for the supported destinations, as
/// (destination, freight per kg, duty fraction).
const BUILTIN_RATES: [(&str, f64, f64); 8] = [
    ("USA", 120.0, 0.08),
    ("Germany", 95.0, 0.12),
    ("UK", 110.0, 0.10),
    ("Japan", 85.0, 0.15),
    ("Australia", 105.0, 0.05),
    ("Canada", 115.0, 0.09),
    ("France", 90.0, 0.11),
    ("Italy", 88.0, 0.13),
];

/// Freight and duty rates for one destination at a specific version.
///
/// Cards are stored externally as JSON files, one card per file, and
/// loaded with [`load_rate_cards_from_dir`].  The `version` string
/// identifies the revision of the card (for example `"2025"` or
/// `"2025-Q3"`) so that a quote can record which rates priced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    /// Destination country this card applies to, e.g. `"USA"`.
    pub destination: String,
    /// Revision of this card.
    #[serde(default = "builtin_version")]
    pub version: String,
    /// Freight rate per kilogram of shipment weight.
    pub freight_per_kg: f64,
    /// Customs duty as a fraction of product value, e.g. `0.08`.
    pub duty_rate: f64,
}

fn builtin_version() -> String {
    "builtin".to_string()
}

/// Error raised while loading rate cards from disk.  Individual files
/// that fail to parse are skipped with a warning rather than failing
/// the whole load; only an unreadable directory is an error.
#[derive(Debug, Error)]
pub enum RateConfigError {
    #[error("failed to read rate card directory {path}")]
    UnreadableDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The set of rate cards the estimator prices against.
///
/// Lookups are total: a destination without a card falls back to
/// [`DEFAULT_FREIGHT_PER_KG`] and [`DEFAULT_DUTY_RATE`].  The default
/// schedule carries the built-in cards for the eight supported
/// destinations.
#[derive(Debug, Clone)]
pub struct RateSchedule {
    cards: HashMap<String, RateCard>,
}

impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule::new(BUILTIN_RATES.iter().map(|(destination, freight, duty)| {
            RateCard {
                destination: destination.to_string(),
                version: builtin_version(),
                freight_per_kg: *freight,
                duty_rate: *duty,
            }
        }))
    }
}

impl RateSchedule {
    /// Builds a schedule from the given cards.  Later cards replace
    /// earlier ones for the same destination.
    pub fn new(cards: impl IntoIterator<Item = RateCard>) -> Self {
        let mut schedule = RateSchedule {
            cards: HashMap::new(),
        };
        schedule.extend(cards);
        schedule
    }

    /// An empty schedule: every destination prices at the default rates.
    pub fn empty() -> Self {
        RateSchedule {
            cards: HashMap::new(),
        }
    }

    /// Inserts or replaces cards, keyed by destination.
    pub fn extend(&mut self, cards: impl IntoIterator<Item = RateCard>) {
        for card in cards {
            self.cards.insert(card.destination.clone(), card);
        }
    }

    /// The card for a destination, if one is configured.
    pub fn card(&self, destination: &str) -> Option<&RateCard> {
        self.cards.get(destination)
    }

    /// Freight rate per kilogram for a destination, falling back to
    /// the default rate for unknown destinations.
    pub fn freight_per_kg(&self, destination: &str) -> f64 {
        self.card(destination)
            .map(|card| card.freight_per_kg)
            .unwrap_or(DEFAULT_FREIGHT_PER_KG)
    }

    /// Customs duty fraction for a destination, falling back to the
    /// default rate for unknown destinations.
    pub fn duty_rate(&self, destination: &str) -> f64 {
        self.card(destination)
            .map(|card| card.duty_rate)
            .unwrap_or(DEFAULT_DUTY_RATE)
    }

    /// All configured cards, sorted by destination.
    pub fn cards(&self) -> Vec<&RateCard> {
        let mut cards: Vec<&RateCard> = self.cards.values().collect();
        cards.sort_by(|a, b| a.destination.cmp(&b.destination));
        cards
    }

    /// The destinations with a configured card, sorted.
    pub fn destinations(&self) -> Vec<&str> {
        let mut destinations: Vec<&str> = self.cards.keys().map(String::as_str).collect();
        destinations.sort_unstable();
        destinations
    }
}

/// Load all rate cards from a directory.
///
/// Scans the directory and parses any `.json` file as a [`RateCard`].
/// Files that fail to parse are logged and skipped so that one broken
/// card does not take down the rest of the schedule.  Duplicate
/// destinations are not checked here; [`RateSchedule::extend`] keeps
/// the last card inserted.
pub fn load_rate_cards_from_dir(path: &Path) -> Result<Vec<RateCard>, RateConfigError> {
    let mut cards = Vec::new();
    let entries = std::fs::read_dir(path).map_err(|source| RateConfigError::UnreadableDir {
        path: path.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| RateConfigError::UnreadableDir {
            path: path.to_path_buf(),
            source,
        })?;
        let file = entry.path();
        if file.extension().map_or(false, |ext| ext == "json") {
            match std::fs::read_to_string(&file) {
                Ok(data) => match serde_json::from_str::<RateCard>(&data) {
                    Ok(card) => cards.push(card),
                    Err(err) => {
                        tracing::warn!("skipping rate card {:?}: {}", file, err);
                    }
                },
                Err(err) => {
                    tracing::warn!("skipping unreadable rate card {:?}: {}", file, err);
                }
            }
        }
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_schedule_carries_the_supported_destinations() {
        let schedule = RateSchedule::default();
        assert_eq!(schedule.freight_per_kg("USA"), 120.0);
        assert_eq!(schedule.duty_rate("USA"), 0.08);
        assert_eq!(schedule.freight_per_kg("Japan"), 85.0);
        assert_eq!(schedule.duty_rate("Japan"), 0.15);
        assert_eq!(schedule.freight_per_kg("Italy"), 88.0);
        assert_eq!(schedule.duty_rate("Italy"), 0.13);
        assert_eq!(schedule.destinations().len(), 8);
    }

    #[test]
    fn unknown_destination_prices_at_default_rates() {
        let schedule = RateSchedule::default();
        assert!(schedule.card("Atlantis").is_none());
        assert_eq!(schedule.freight_per_kg("Atlantis"), DEFAULT_FREIGHT_PER_KG);
        assert_eq!(schedule.duty_rate("Atlantis"), DEFAULT_DUTY_RATE);
    }

    #[test]
    fn extend_replaces_cards_by_destination() {
        let mut schedule = RateSchedule::default();
        schedule.extend([RateCard {
            destination: "USA".to_string(),
            version: "2026".to_string(),
            freight_per_kg: 130.0,
            duty_rate: 0.07,
        }]);
        assert_eq!(schedule.freight_per_kg("USA"), 130.0);
        assert_eq!(schedule.card("USA").unwrap().version, "2026");
        assert_eq!(schedule.destinations().len(), 8);
    }

    #[test]
    fn loader_parses_cards_and_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("usa.json"),
            r#"{"destination": "USA", "version": "2026", "freight_per_kg": 125.0, "duty_rate": 0.085}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("brazil.json"),
            r#"{"destination": "Brazil", "freight_per_kg": 140.0, "duty_rate": 0.18}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut cards = load_rate_cards_from_dir(dir.path()).unwrap();
        cards.sort_by(|a, b| a.destination.cmp(&b.destination));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].destination, "Brazil");
        assert_eq!(cards[0].version, "builtin");
        assert_eq!(cards[1].destination, "USA");
        assert_eq!(cards[1].freight_per_kg, 125.0);
    }

    #[test]
    fn loader_errors_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(load_rate_cards_from_dir(&missing).is_err());
    }
}
