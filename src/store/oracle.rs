use serde::{Deserialize, Serialize};

use super::traits::OracleStore;
use crate::errors::ForgeResult;

const CARDS_FIXTURE: &str = include_str!("../../fixtures/oracle_cards.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleCard {
    pub id: u64,
    pub archetype: String,
    pub title: String,
    pub description: String,
    pub pain_category: String,
}

impl OracleCard {
    pub fn summary(&self) -> String {
        format!(
            "{}\n\nArchetype: {}\nDescription: {}\nPain Category: {}",
            self.title, self.archetype, self.description, self.pain_category
        )
    }

    pub fn implementation_hint(&self) -> String {
        format!(
            "Create a {} as a PDF guide or checklist",
            self.title.to_lowercase()
        )
    }

    pub fn target_audience(&self) -> String {
        format!("People struggling with {}", self.pain_category)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryOracleStore {
    cards: Vec<OracleCard>,
}

impl InMemoryOracleStore {
    pub fn new(cards: Vec<OracleCard>) -> Self {
        Self { cards }
    }

    pub fn from_fixture() -> ForgeResult<Self> {
        let cards: Vec<OracleCard> = serde_json::from_str(CARDS_FIXTURE)?;
        Ok(Self::new(cards))
    }
}

impl OracleStore for InMemoryOracleStore {
    fn all_cards(&self) -> Vec<OracleCard> {
        self.cards.clone()
    }

    fn cards_by_archetype(&self, archetype: &str) -> Vec<OracleCard> {
        let needle = archetype.to_lowercase();
        self.cards
            .iter()
            .filter(|card| card.archetype.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn card_at(&self, index: usize) -> Option<OracleCard> {
        self.cards.get(index).cloned()
    }
}
