//! Personality tuning profiles loaded from TOML
//!
//! The three temperaments share a fixed behavioral shape; these profiles
//! tune the thresholds inside it. Code defaults match the shipped files
//! under `data/personalities/`, so the engine runs without a data dir.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::campaign::marshal::Personality;

/// Tuning for one temperament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Action points charged to issue a standing order
    #[serde(default = "default_issue_cost")]
    pub issue_cost: u32,
    /// Strength ratio at which a blocked road is answered with steel
    /// rather than a courier to the player (aggressive only)
    #[serde(default = "default_engage_ratio")]
    pub engage_ratio: f32,
    /// Strength ratio required before sallying out of a held position
    #[serde(default = "default_sally_ratio")]
    pub sally_ratio: f32,
    /// Turns of drill bonus granted on order completion
    #[serde(default)]
    pub drill_bonus_turns: u32,
    /// Trust adjustment granted on order completion
    #[serde(default)]
    pub completion_trust: f32,
}

fn default_issue_cost() -> u32 {
    2
}

fn default_engage_ratio() -> f32 {
    0.7
}

fn default_sally_ratio() -> f32 {
    1.0
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self {
            issue_cost: default_issue_cost(),
            engage_ratio: default_engage_ratio(),
            sally_ratio: default_sally_ratio(),
            drill_bonus_turns: 0,
            completion_trust: 0.25,
        }
    }
}

/// The full profile set, one per temperament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityProfiles {
    pub aggressive: PersonalityProfile,
    pub cautious: PersonalityProfile,
    pub literal: PersonalityProfile,
}

impl Default for PersonalityProfiles {
    fn default() -> Self {
        Self {
            aggressive: PersonalityProfile::default(),
            cautious: PersonalityProfile::default(),
            literal: PersonalityProfile {
                // Literal marshals execute standing orders more
                // efficiently and drill hard after a success.
                issue_cost: 1,
                drill_bonus_turns: 3,
                completion_trust: 0.5,
                ..PersonalityProfile::default()
            },
        }
    }
}

impl PersonalityProfiles {
    pub fn for_personality(&self, personality: Personality) -> &PersonalityProfile {
        match personality {
            Personality::Aggressive => &self.aggressive,
            Personality::Cautious => &self.cautious,
            Personality::Literal => &self.literal,
        }
    }

    /// Load all three profiles from `data/personalities/`, falling back
    /// to defaults for any file that is missing or malformed.
    pub fn load_or_default() -> Self {
        let mut profiles = Self::default();
        for (name, slot) in [
            ("aggressive", &mut profiles.aggressive),
            ("cautious", &mut profiles.cautious),
            ("literal", &mut profiles.literal),
        ] {
            match load_profile(name) {
                Ok(profile) => *slot = profile,
                Err(e) => {
                    tracing::warn!("personality profile '{}' not loaded: {}", name, e);
                }
            }
        }
        profiles
    }
}

/// Load one profile from `data/personalities/{name}.toml`
pub fn load_profile(name: &str) -> Result<PersonalityProfile, String> {
    let path = profile_path(name);

    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("failed to read profile file {:?}: {}", path, e))?;

    toml::from_str(&contents).map_err(|e| format!("failed to parse profile TOML: {}", e))
}

fn profile_path(name: &str) -> PathBuf {
    PathBuf::from("data/personalities").join(format!("{}.toml", name))
}
