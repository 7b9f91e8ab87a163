use alloc::vec::Vec;

use crate::fish::{Fish, FishType};

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub species: FishType,
    pub coin_value: u32,
    pub caught: u32,
    pub unlocked: bool,
}

impl CatalogEntry {
    pub fn new(species: FishType, coin_value: u32) -> Self {
        Self {
            species,
            coin_value,
            caught: 0,
            unlocked: false,
        }
    }
}

/// Record of every species and how many of each have been landed.
///
/// Fish are matched to entries by name. Landed fish never go back into the
/// flock, the catalog only counts them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, species: FishType, coin_value: u32) {
        self.entries.push(CatalogEntry::new(species, coin_value));
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.species.name == name)
    }

    /// Count the landed fish and return the coins they are worth
    pub fn record_catch(&mut self, landed: &[Fish]) -> u32 {
        let mut coins = 0;
        for fish in landed {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.species.name == fish.name) {
                entry.caught += 1;
                entry.unlocked = true;
                coins += entry.coin_value;
            } else {
                log::warn!("caught {} which is not in the catalog", fish.name);
            }
        }
        coins
    }

    pub fn value_of(&self, fish: &Fish) -> u32 {
        self.entry(&fish.name).map_or(0, |e| e.coin_value)
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.unlocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fish::FishColors;

    fn species(name: &str) -> FishType {
        FishType::new(name, 0.1, 1.0, 1.0, FishColors::default())
    }

    fn landed(name: &str) -> Fish {
        Fish::new(name, 0.1, 1.0, FishColors::default())
    }

    #[test]
    fn test_record_catch_counts_and_pays() {
        let mut catalog = Catalog::new();
        catalog.add_entry(species("minnow"), 2);
        catalog.add_entry(species("pike"), 15);

        let coins = catalog.record_catch(&[landed("pike"), landed("minnow"), landed("pike")]);
        assert_eq!(coins, 32);

        let pike = catalog.entry("pike").unwrap();
        assert_eq!(pike.caught, 2);
        assert!(pike.unlocked);
        assert_eq!(catalog.unlocked_count(), 2);
    }

    #[test]
    fn test_unknown_species_is_worth_nothing() {
        let mut catalog = Catalog::new();
        catalog.add_entry(species("minnow"), 2);

        assert_eq!(catalog.record_catch(&[landed("kraken")]), 0);
        assert_eq!(catalog.value_of(&landed("kraken")), 0);
        assert_eq!(catalog.value_of(&landed("minnow")), 2);
        assert_eq!(catalog.unlocked_count(), 0);
    }
}
