use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{TwainError, TwainResult};

const BUILTIN_CATALOG: &str = include_str!("../../prompts/twain_prompts.json");

/// Opening lines for the intro card; one is chosen per batch.
pub const INTRO_HOOKS: [&str; 9] = [
    "5 Questions to Ask Your Partner Tonight",
    "Brave Questions for Couples",
    "5 Things to Ask Your Partner Before Bed",
    "5 Deep Questions to Spark Intimacy",
    "Surprising Questions for You and Your Partner",
    "5 Quick Prompts to Reconnect as a Couple",
    "How Well Do You Know Your Partner?",
    "Try These 5 Questions With Your Person",
    "Questions Every Couple Should Try Together",
];

pub fn pick_hook(rng: &mut impl rand::Rng) -> &'static str {
    INTRO_HOOKS.choose(rng).copied().unwrap_or(INTRO_HOOKS[0])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Light,
    Medium,
    Deep,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Light, Difficulty::Medium, Difficulty::Deep];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Light => "light",
            Difficulty::Medium => "medium",
            Difficulty::Deep => "deep",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompts for one category, one per difficulty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tiers {
    pub light: String,
    pub medium: String,
    pub deep: String,
}

impl Tiers {
    pub fn get(&self, difficulty: Difficulty) -> &str {
        match difficulty {
            Difficulty::Light => &self.light,
            Difficulty::Medium => &self.medium,
            Difficulty::Deep => &self.deep,
        }
    }
}

/// A rolled category and difficulty with the prompt that goes with them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub category: String,
    pub difficulty: Difficulty,
    pub prompt: String,
}

/// `{category: {light|medium|deep: prompt}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptCatalog {
    categories: BTreeMap<String, Tiers>,
}

impl PromptCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> TwainResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> TwainResult<Self> {
        let catalog: PromptCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_path(path: &Path) -> TwainResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> TwainResult<()> {
        if self.categories.is_empty() {
            return Err(TwainError::validation("prompt catalog has no categories"));
        }
        for (name, tiers) in &self.categories {
            if name.trim().is_empty() {
                return Err(TwainError::validation("prompt catalog has an unnamed category"));
            }
            for d in Difficulty::ALL {
                if tiers.get(d).trim().is_empty() {
                    return Err(TwainError::validation(format!(
                        "category '{name}' has an empty {d} prompt"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn prompt(&self, category: &str, difficulty: Difficulty) -> Option<&str> {
        self.categories.get(category).map(|t| t.get(difficulty))
    }

    /// Uniformly pick a category and, independently, a difficulty.
    pub fn roll(&self, rng: &mut impl rand::Rng) -> TwainResult<Theme> {
        let names: Vec<&String> = self.categories.keys().collect();
        let category = names
            .choose(rng)
            .ok_or_else(|| TwainError::validation("prompt catalog has no categories"))?;
        let difficulty = *Difficulty::ALL
            .choose(rng)
            .unwrap_or(&Difficulty::Medium);
        let prompt = self.categories[*category].get(difficulty).to_string();
        Ok(Theme {
            category: (*category).clone(),
            difficulty,
            prompt,
        })
    }
}
