//! # EBCT Characteristic Checklist
//!
//! Checklist of 34 organizational/commercial characteristics grouped into
//! four phases, each scored on a three-state scale (not-met / in-progress /
//! met). Phase and overall scores are weighted integer centi-values
//! (0-100); the traffic-light classification uses the same cutoffs as the
//! intake worksheet: Green >= 90, Amber >= 40, Red below.
//!
//! An unanswered characteristic counts as in-progress, so a half-filled
//! checklist reads Amber rather than Red.

use crate::primitives::{
    AMBER_THRESHOLD_CENTI, GREEN_THRESHOLD_CENTI, IN_PROGRESS_CENTI, MET_CENTI, NOT_MET_CENTI,
};
use crate::types::InnovaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// IDENTIFIERS & ANSWER SCALE
// =============================================================================

/// Identifier of one checklist characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacteristicId(pub u32);

/// Three-state answer for a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    /// The characteristic is not implemented.
    NotMet,
    /// Implementation in progress or partially satisfied.
    InProgress,
    /// The characteristic fully satisfies the criteria.
    Met,
}

impl TriState {
    /// Integer centi-score contribution of this answer.
    #[must_use]
    pub const fn centi(self) -> u32 {
        match self {
            TriState::NotMet => NOT_MET_CENTI,
            TriState::InProgress => IN_PROGRESS_CENTI,
            TriState::Met => MET_CENTI,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TriState::NotMet => "Not met",
            TriState::InProgress => "In progress",
            TriState::Met => "Met",
        }
    }
}

/// Traffic-light classification of a centi-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLight {
    Red,
    Amber,
    Green,
}

impl TrafficLight {
    /// Classify an integer centi-score.
    #[must_use]
    pub const fn from_centi(centi: u32) -> Self {
        if centi >= GREEN_THRESHOLD_CENTI {
            TrafficLight::Green
        } else if centi >= AMBER_THRESHOLD_CENTI {
            TrafficLight::Amber
        } else {
            TrafficLight::Red
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// One weighted characteristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    /// Stable identifier, unique across all phases.
    pub id: CharacteristicId,
    /// What the characteristic asserts about the venture.
    pub name: String,
    /// Relative weight within its phase.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// One phase grouping a set of characteristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistPhase {
    /// Phase number (1-4).
    pub id: u8,
    /// Phase name.
    pub name: String,
    /// Characteristics evaluated in this phase.
    pub characteristics: Vec<Characteristic>,
}

/// The full checklist catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistCatalog {
    /// Phases in evaluation order.
    pub phases: Vec<ChecklistPhase>,
}

impl ChecklistCatalog {
    /// Find a characteristic by identifier.
    #[must_use]
    pub fn characteristic(&self, id: CharacteristicId) -> Option<&Characteristic> {
        self.phases
            .iter()
            .flat_map(|p| p.characteristics.iter())
            .find(|c| c.id == id)
    }

    /// Total number of characteristics across all phases.
    #[must_use]
    pub fn total_characteristics(&self) -> usize {
        self.phases.iter().map(|p| p.characteristics.len()).sum()
    }

    /// Parse a catalog from a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, InnovaError> {
        let catalog: ChecklistCatalog = toml::from_str(input)
            .map_err(|e| InnovaError::DeserializationError(format!("checklist toml: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate structural invariants: non-empty phases, unique ids,
    /// non-zero weights.
    pub fn validate(&self) -> Result<(), InnovaError> {
        if self.phases.is_empty() {
            return Err(InnovaError::InvalidSchema("no checklist phases".into()));
        }
        let mut seen = std::collections::BTreeSet::new();
        for phase in &self.phases {
            for item in &phase.characteristics {
                if !seen.insert(item.id) {
                    return Err(InnovaError::InvalidSchema(format!(
                        "duplicate characteristic id {}",
                        item.id.0
                    )));
                }
                if item.weight == 0 {
                    return Err(InnovaError::InvalidSchema(format!(
                        "characteristic {} has zero weight",
                        item.id.0
                    )));
                }
            }
        }
        Ok(())
    }

    /// The built-in 34-characteristic catalog in four phases.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            phases: vec![
                phase(1, "Technical validation", 1, &[
                    ("Problem and solution described in technical terms", 1),
                    ("Working principle demonstrated experimentally", 2),
                    ("Laboratory results documented and reproducible", 2),
                    ("Critical technical risks identified", 1),
                    ("Prototype available for third-party evaluation", 2),
                    ("Regulatory or certification path identified", 1),
                    ("Technical development plan with milestones", 1),
                    ("Scale-up constraints analyzed", 1),
                ]),
                phase(2, "Intellectual property", 9, &[
                    ("Inventory of protectable assets maintained", 1),
                    ("Prior-art searches performed with professionals", 2),
                    ("Protection strategy agreed (patent, secret, license)", 2),
                    ("Ownership agreements signed by all contributors", 2),
                    ("Priority filings in place for core assets", 2),
                    ("Freedom-to-operate analysis available", 1),
                    ("IP budget and renewals planned", 1),
                    ("Licensing or transfer terms drafted", 1),
                ]),
                phase(3, "Market preparation", 17, &[
                    ("Target segments identified and prioritized", 2),
                    ("Customer discovery interviews documented", 2),
                    ("Value proposition tested with customers", 2),
                    ("Competitive landscape mapped", 1),
                    ("Pricing hypothesis formulated", 1),
                    ("Sales channels identified", 1),
                    ("Pilot or demonstration agreements in place", 2),
                    ("Early adopters providing recurring feedback", 2),
                    ("Business model reviewed with stakeholders", 1),
                    ("Demand projections supported by evidence", 1),
                ]),
                phase(4, "Organization and growth", 27, &[
                    ("Core team covers technical and commercial roles", 2),
                    ("Governance and decision process defined", 1),
                    ("Financial plan for next stage approved", 2),
                    ("Funding sources engaged or committed", 2),
                    ("Operational processes documented", 1),
                    ("Quality management practices in place", 1),
                    ("Export or expansion strategy outlined", 1),
                    ("Partnerships formalized with agreements", 1),
                ]),
            ],
        }
    }
}

fn phase(id: u8, name: &str, first_id: u32, items: &[(&str, u32)]) -> ChecklistPhase {
    ChecklistPhase {
        id,
        name: name.to_string(),
        characteristics: items
            .iter()
            .enumerate()
            .map(|(offset, (item_name, weight))| Characteristic {
                id: CharacteristicId(first_id.saturating_add(offset as u32)),
                name: (*item_name).to_string(),
                weight: *weight,
            })
            .collect(),
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Rollup for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSummary {
    /// Phase number.
    pub id: u8,
    /// Phase name.
    pub name: String,
    /// Counts per answer state.
    pub met: usize,
    pub in_progress: usize,
    pub not_met: usize,
    pub unanswered: usize,
    /// Weighted centi-score (0-100).
    pub score_centi: u32,
    /// Traffic-light classification of the phase score.
    pub light: TrafficLight,
}

/// Rollup across the full checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSummary {
    /// Per-phase summaries in catalog order.
    pub phases: Vec<PhaseSummary>,
    /// Weighted overall centi-score (0-100).
    pub overall_centi: u32,
    /// Traffic-light classification of the overall score.
    pub light: TrafficLight,
    /// Characteristics with an explicit answer.
    pub answered: usize,
    /// Total characteristics in the catalog.
    pub total: usize,
}

/// Summarize a set of answers against the catalog.
///
/// Unanswered characteristics score `IN_PROGRESS_CENTI` and are reported in
/// the `unanswered` counts.
#[must_use]
pub fn summarize(
    catalog: &ChecklistCatalog,
    answers: &BTreeMap<CharacteristicId, TriState>,
) -> ChecklistSummary {
    let mut phases = Vec::with_capacity(catalog.phases.len());
    let mut total_weighted: u64 = 0;
    let mut total_weight: u64 = 0;
    let mut answered = 0usize;

    for phase in &catalog.phases {
        let mut met = 0usize;
        let mut in_progress = 0usize;
        let mut not_met = 0usize;
        let mut unanswered = 0usize;
        let mut phase_weighted: u64 = 0;
        let mut phase_weight: u64 = 0;

        for item in &phase.characteristics {
            let weight = u64::from(item.weight);
            let centi = match answers.get(&item.id) {
                Some(TriState::Met) => {
                    met = met.saturating_add(1);
                    answered = answered.saturating_add(1);
                    MET_CENTI
                }
                Some(TriState::InProgress) => {
                    in_progress = in_progress.saturating_add(1);
                    answered = answered.saturating_add(1);
                    IN_PROGRESS_CENTI
                }
                Some(TriState::NotMet) => {
                    not_met = not_met.saturating_add(1);
                    answered = answered.saturating_add(1);
                    NOT_MET_CENTI
                }
                None => {
                    unanswered = unanswered.saturating_add(1);
                    IN_PROGRESS_CENTI
                }
            };
            phase_weighted = phase_weighted.saturating_add(weight.saturating_mul(u64::from(centi)));
            phase_weight = phase_weight.saturating_add(weight);
        }

        total_weighted = total_weighted.saturating_add(phase_weighted);
        total_weight = total_weight.saturating_add(phase_weight);

        let score_centi = if phase_weight > 0 {
            (phase_weighted / phase_weight) as u32
        } else {
            0
        };

        phases.push(PhaseSummary {
            id: phase.id,
            name: phase.name.clone(),
            met,
            in_progress,
            not_met,
            unanswered,
            score_centi,
            light: TrafficLight::from_centi(score_centi),
        });
    }

    let overall_centi = if total_weight > 0 {
        (total_weighted / total_weight) as u32
    } else {
        0
    };

    ChecklistSummary {
        phases,
        overall_centi,
        light: TrafficLight::from_centi(overall_centi),
        answered,
        total: catalog.total_characteristics(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = ChecklistCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.phases.len(), 4);
        assert_eq!(catalog.total_characteristics(), 34);
    }

    #[test]
    fn builtin_ids_are_contiguous() {
        let catalog = ChecklistCatalog::builtin();
        let ids: Vec<u32> = catalog
            .phases
            .iter()
            .flat_map(|p| p.characteristics.iter())
            .map(|c| c.id.0)
            .collect();
        let expected: Vec<u32> = (1..=34).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn tristate_centi_values() {
        assert_eq!(TriState::NotMet.centi(), 0);
        assert_eq!(TriState::InProgress.centi(), 50);
        assert_eq!(TriState::Met.centi(), 100);
    }

    #[test]
    fn traffic_light_cutoffs() {
        assert_eq!(TrafficLight::from_centi(100), TrafficLight::Green);
        assert_eq!(TrafficLight::from_centi(90), TrafficLight::Green);
        assert_eq!(TrafficLight::from_centi(89), TrafficLight::Amber);
        assert_eq!(TrafficLight::from_centi(40), TrafficLight::Amber);
        assert_eq!(TrafficLight::from_centi(39), TrafficLight::Red);
        assert_eq!(TrafficLight::from_centi(0), TrafficLight::Red);
    }

    #[test]
    fn empty_answers_read_amber() {
        let catalog = ChecklistCatalog::builtin();
        let summary = summarize(&catalog, &BTreeMap::new());

        assert_eq!(summary.answered, 0);
        assert_eq!(summary.total, 34);
        assert_eq!(summary.overall_centi, 50);
        assert_eq!(summary.light, TrafficLight::Amber);
        for phase in &summary.phases {
            assert_eq!(phase.met + phase.in_progress + phase.not_met, 0);
            assert!(phase.unanswered > 0);
            assert_eq!(phase.light, TrafficLight::Amber);
        }
    }

    #[test]
    fn all_met_reads_green() {
        let catalog = ChecklistCatalog::builtin();
        let mut answers = BTreeMap::new();
        for phase in &catalog.phases {
            for item in &phase.characteristics {
                answers.insert(item.id, TriState::Met);
            }
        }
        let summary = summarize(&catalog, &answers);
        assert_eq!(summary.overall_centi, 100);
        assert_eq!(summary.light, TrafficLight::Green);
        assert_eq!(summary.answered, 34);
    }

    #[test]
    fn all_not_met_reads_red() {
        let catalog = ChecklistCatalog::builtin();
        let mut answers = BTreeMap::new();
        for phase in &catalog.phases {
            for item in &phase.characteristics {
                answers.insert(item.id, TriState::NotMet);
            }
        }
        let summary = summarize(&catalog, &answers);
        assert_eq!(summary.overall_centi, 0);
        assert_eq!(summary.light, TrafficLight::Red);
    }

    #[test]
    fn weights_shift_phase_score() {
        // Phase 1 of the built-in catalog has mixed weights; meeting only the
        // heavy items must score higher than meeting the same number of
        // light ones.
        let catalog = ChecklistCatalog::builtin();
        let phase1 = &catalog.phases[0];
        let heavy: Vec<_> = phase1
            .characteristics
            .iter()
            .filter(|c| c.weight > 1)
            .map(|c| c.id)
            .collect();
        let light: Vec<_> = phase1
            .characteristics
            .iter()
            .filter(|c| c.weight == 1)
            .map(|c| c.id)
            .collect();
        assert!(!heavy.is_empty() && !light.is_empty());

        let mut met_heavy = BTreeMap::new();
        for phase in &catalog.phases {
            for item in &phase.characteristics {
                met_heavy.insert(item.id, TriState::NotMet);
            }
        }
        let mut met_light = met_heavy.clone();
        for id in &heavy {
            met_heavy.insert(*id, TriState::Met);
        }
        for id in light.iter().take(heavy.len()) {
            met_light.insert(*id, TriState::Met);
        }

        let heavy_score = summarize(&catalog, &met_heavy).phases[0].score_centi;
        let light_score = summarize(&catalog, &met_light).phases[0].score_centi;
        assert!(heavy_score > light_score);
    }

    #[test]
    fn summarize_is_deterministic() {
        let catalog = ChecklistCatalog::builtin();
        let mut answers = BTreeMap::new();
        answers.insert(CharacteristicId(1), TriState::Met);
        answers.insert(CharacteristicId(9), TriState::InProgress);

        let first = summarize(&catalog, &answers);
        let second = summarize(&catalog, &answers);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let catalog = ChecklistCatalog {
            phases: vec![
                phase(1, "a", 1, &[("x", 1)]),
                phase(2, "b", 1, &[("y", 1)]),
            ],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn toml_catalog_parses() {
        let doc = r#"
            [[phases]]
            id = 1
            name = "Technical validation"

            [[phases.characteristics]]
            id = 1
            name = "Prototype demonstrated"
            weight = 2

            [[phases.characteristics]]
            id = 2
            name = "Risks identified"
        "#;
        let catalog = ChecklistCatalog::from_toml_str(doc).expect("parse catalog");
        assert_eq!(catalog.total_characteristics(), 2);
        assert_eq!(
            catalog
                .characteristic(CharacteristicId(2))
                .expect("item 2")
                .weight,
            1
        );
    }
}
