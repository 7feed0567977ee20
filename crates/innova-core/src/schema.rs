//! # Assessment Schema
//!
//! Immutable catalog of dimensions, levels, and questions.
//!
//! The schema is fixed at load time and never changes while an evaluation
//! session is open. Levels are stored in ascending rank order and evaluated
//! in that order by the score evaluator.
//!
//! A built-in catalog covers the six IRL dimensions (CRL, BRL, TRL, IPRL,
//! TmRL, FRL) with nine levels each; deployments can replace it with a TOML
//! catalog loaded through [`AssessmentSchema::from_toml_str`].

use crate::primitives::{
    MAX_DIMENSION_CODE_LENGTH, MAX_DIMENSIONS, MAX_LEVELS_PER_DIMENSION, MAX_NAME_LENGTH,
    MAX_QUESTION_LENGTH, MAX_QUESTIONS_PER_LEVEL,
};
use crate::{DimensionId, InnovaError, LevelRank};
use serde::{Deserialize, Serialize};

// =============================================================================
// SCHEMA TYPES
// =============================================================================

/// One level within a dimension: a rank, a description, and its questions.
///
/// A level with no questions is a single yes/no answer with its own
/// evidence field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSchema {
    /// Numeric rank (1-9).
    pub rank: LevelRank,
    /// Short description of what the level certifies.
    pub description: String,
    /// Ordered question prompts; may be empty.
    #[serde(default)]
    pub questions: Vec<String>,
}

impl LevelSchema {
    /// Number of questions; 0 means the level is a single answer.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Whether the level carries sub-questions.
    #[must_use]
    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }
}

/// One maturity dimension: an identifier, a display name, and ordered levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSchema {
    /// Compact dimension code (e.g. "CRL").
    pub id: DimensionId,
    /// Human-readable name.
    pub name: String,
    /// Levels in ascending rank order.
    pub levels: Vec<LevelSchema>,
}

impl DimensionSchema {
    /// The lowest rank of the dimension, if any levels are defined.
    #[must_use]
    pub fn baseline(&self) -> Option<LevelRank> {
        self.levels.first().map(|l| l.rank)
    }

    /// The highest rank of the dimension, or 0 for an empty dimension.
    #[must_use]
    pub fn top_rank(&self) -> u8 {
        self.levels.last().map_or(0, |l| l.rank.value())
    }

    /// Find a level by rank.
    #[must_use]
    pub fn level(&self, rank: LevelRank) -> Option<&LevelSchema> {
        self.levels.iter().find(|l| l.rank == rank)
    }
}

/// The full assessment catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSchema {
    /// Dimensions in presentation order.
    pub dimensions: Vec<DimensionSchema>,
}

impl AssessmentSchema {
    /// Find a dimension by identifier.
    #[must_use]
    pub fn dimension(&self, id: &DimensionId) -> Option<&DimensionSchema> {
        self.dimensions.iter().find(|d| &d.id == id)
    }

    /// All dimension identifiers in order.
    #[must_use]
    pub fn dimension_ids(&self) -> Vec<DimensionId> {
        self.dimensions.iter().map(|d| d.id.clone()).collect()
    }

    /// Parse a schema from a TOML document and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self, InnovaError> {
        let schema: AssessmentSchema = toml::from_str(input)
            .map_err(|e| InnovaError::DeserializationError(format!("schema toml: {e}")))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Validate structural invariants.
    ///
    /// Checks run once at load time, never during scoring:
    /// - at least one dimension, at most `MAX_DIMENSIONS`
    /// - unique, non-empty dimension codes within length limits
    /// - ranks start at 1 or above and are strictly ascending
    /// - per-dimension and per-level size limits
    pub fn validate(&self) -> Result<(), InnovaError> {
        if self.dimensions.is_empty() {
            return Err(InnovaError::InvalidSchema("no dimensions defined".into()));
        }
        if self.dimensions.len() > MAX_DIMENSIONS {
            return Err(InnovaError::InvalidSchema(format!(
                "dimension count {} exceeds maximum {}",
                self.dimensions.len(),
                MAX_DIMENSIONS
            )));
        }

        let mut seen_codes: Vec<&str> = Vec::new();
        for dim in &self.dimensions {
            let code = dim.id.as_str();
            if code.is_empty() || code.len() > MAX_DIMENSION_CODE_LENGTH {
                return Err(InnovaError::InvalidSchema(format!(
                    "invalid dimension code '{code}'"
                )));
            }
            if seen_codes.contains(&code) {
                return Err(InnovaError::InvalidSchema(format!(
                    "duplicate dimension code '{code}'"
                )));
            }
            seen_codes.push(code);

            if dim.name.len() > MAX_NAME_LENGTH {
                return Err(InnovaError::InvalidSchema(format!(
                    "dimension name too long for '{code}'"
                )));
            }
            if dim.levels.len() > MAX_LEVELS_PER_DIMENSION {
                return Err(InnovaError::InvalidSchema(format!(
                    "level count {} exceeds maximum {} in '{code}'",
                    dim.levels.len(),
                    MAX_LEVELS_PER_DIMENSION
                )));
            }

            let mut previous: Option<u8> = None;
            for level in &dim.levels {
                let rank = level.rank.value();
                if rank == 0 {
                    return Err(InnovaError::InvalidSchema(format!(
                        "level rank 0 in '{code}'; ranks start at 1"
                    )));
                }
                if let Some(prev) = previous
                    && rank <= prev
                {
                    return Err(InnovaError::InvalidSchema(format!(
                        "levels out of order in '{code}': {rank} after {prev}"
                    )));
                }
                previous = Some(rank);

                if level.questions.len() > MAX_QUESTIONS_PER_LEVEL {
                    return Err(InnovaError::InvalidSchema(format!(
                        "question count {} exceeds maximum {} in '{code}' level {rank}",
                        level.questions.len(),
                        MAX_QUESTIONS_PER_LEVEL
                    )));
                }
                for q in &level.questions {
                    if q.is_empty() || q.len() > MAX_QUESTION_LENGTH {
                        return Err(InnovaError::InvalidSchema(format!(
                            "invalid question prompt in '{code}' level {rank}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// The built-in six-dimension IRL catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            dimensions: vec![
                crl_dimension(),
                brl_dimension(),
                trl_dimension(),
                iprl_dimension(),
                tmrl_dimension(),
                frl_dimension(),
            ],
        }
    }
}

// =============================================================================
// BUILT-IN CATALOG
// =============================================================================

fn level(rank: u8, description: &str, questions: &[&str]) -> LevelSchema {
    LevelSchema {
        rank: LevelRank(rank),
        description: description.to_string(),
        questions: questions.iter().map(|q| (*q).to_string()).collect(),
    }
}

fn dimension(code: &str, name: &str, levels: Vec<LevelSchema>) -> DimensionSchema {
    DimensionSchema {
        id: DimensionId::new(code),
        name: name.to_string(),
        levels,
    }
}

/// CRL - Customer Readiness Level.
fn crl_dimension() -> DimensionSchema {
    dimension(
        "CRL",
        "Customer readiness",
        vec![
            level(
                1,
                "Hypothesized customer problem",
                &["Have you identified a specific problem or need your solution addresses?"],
            ),
            level(
                2,
                "Market familiarity",
                &[
                    "Have you mapped who experiences the problem and in what context?",
                    "Have you talked to potential users about the problem?",
                ],
            ),
            level(
                3,
                "First customer feedback",
                &["Do you have documented feedback from potential customers on the proposed solution?"],
            ),
            level(
                4,
                "Validated problem-solution fit",
                &[
                    "Have customers confirmed the solution addresses their problem?",
                    "Have you prioritized customer segments based on that feedback?",
                ],
            ),
            level(
                5,
                "Established customer relations",
                &["Do you have evidence of concrete interest from customers or users in your solution?"],
            ),
            level(
                6,
                "Testing with customers",
                &["Are customers actively testing the product in their own environment?"],
            ),
            level(
                7,
                "Early paying customers",
                &["Do you have customers paying for the product or committed via letters of intent?"],
            ),
            level(
                8,
                "Repeatable sales",
                &["Can you show a repeatable sales process across multiple customers?"],
            ),
            level(
                9,
                "Widespread product sales",
                &["Is the product sold at scale with established channels and retention data?"],
            ),
        ],
    )
}

/// BRL - Business Model Readiness Level.
fn brl_dimension() -> DimensionSchema {
    dimension(
        "BRL",
        "Business model readiness",
        vec![
            level(
                1,
                "Market need assumed",
                &["Have you described the overall market need your venture responds to?"],
            ),
            level(
                2,
                "Value proposition drafted",
                &["Have you formulated a first value proposition for the offering?"],
            ),
            level(
                3,
                "Business model sketched",
                &[
                    "Have you sketched the full business model (customers, channels, revenues, costs)?",
                    "Have you identified the riskiest assumptions in the model?",
                ],
            ),
            level(
                4,
                "Economic viability estimated",
                &["Have you estimated unit economics or early revenue potential?"],
            ),
            level(
                5,
                "Model tested with stakeholders",
                &["Have you reviewed the business model with customers or industry stakeholders?"],
            ),
            level(
                6,
                "Revenue model validated",
                &["Do early transactions or pilots support the chosen revenue model?"],
            ),
            level(
                7,
                "Business model proven in market",
                &["Does operating data show the model working beyond pilot scale?"],
            ),
            level(
                8,
                "Scalability demonstrated",
                &["Have you demonstrated the model scales across segments or regions?"],
            ),
            level(
                9,
                "Sustainable growth",
                &["Does the organization sustain profitable growth on the established model?"],
            ),
        ],
    )
}

/// TRL - Technology Readiness Level.
fn trl_dimension() -> DimensionSchema {
    dimension(
        "TRL",
        "Technology readiness",
        vec![
            level(
                1,
                "Basic principles observed",
                &["Have the basic principles underlying the technology been observed and reported?"],
            ),
            level(
                2,
                "Technology concept formulated",
                &["Has a practical application of the principles been formulated?"],
            ),
            level(
                3,
                "Experimental proof of concept",
                &["Is there preliminary experimental evidence supporting the concept?"],
            ),
            level(
                4,
                "Validation in laboratory",
                &["Have components been validated together in a laboratory environment?"],
            ),
            level(
                5,
                "Validation in relevant environment",
                &["Has the integrated technology been validated in a relevant environment?"],
            ),
            level(
                6,
                "Prototype in relevant environment",
                &["Has a representative prototype been demonstrated in a relevant environment?"],
            ),
            level(
                7,
                "Prototype in operational environment",
                &["Has the prototype been demonstrated in an operational environment?"],
            ),
            level(
                8,
                "System complete and qualified",
                &["Is the system complete and qualified through test and demonstration?"],
            ),
            level(
                9,
                "System proven in operations",
                &["Is the system proven through successful mission operations?"],
            ),
        ],
    )
}

/// IPRL - Intellectual Property Readiness Level.
fn iprl_dimension() -> DimensionSchema {
    dimension(
        "IPRL",
        "Intellectual property readiness",
        vec![
            level(
                1,
                "Invention identified",
                &["Do you know the unique elements of the invention and its technical field, state of the art, publications?"],
            ),
            level(
                2,
                "IP landscape surveyed",
                &[
                    "Have you assessed protection possibilities through searches of publications and state-of-the-art solutions?",
                    "Have you run initial prior-art or conflicting-rights searches with professionals?",
                ],
            ),
            level(
                3,
                "Protection strategy drafted",
                &["Have you drafted a protection strategy (patent, secret, license) for the core assets?"],
            ),
            level(4, "Priority filing prepared", &[]),
            level(
                5,
                "Application filed",
                &["Has a priority application or registration been filed for the core assets?"],
            ),
            level(
                6,
                "Ownership secured",
                &["Are ownership and inventorship agreements signed by all contributors?"],
            ),
            level(
                7,
                "Portfolio under management",
                &["Is the IP portfolio actively managed against the product roadmap?"],
            ),
            level(
                8,
                "Rights granted",
                &["Have core rights been granted or registered in key markets?"],
            ),
            level(
                9,
                "IP supports the business",
                &["Does the IP position demonstrably support revenue or partnerships?"],
            ),
        ],
    )
}

/// TmRL - Team Readiness Level.
fn tmrl_dimension() -> DimensionSchema {
    dimension(
        "TmRL",
        "Team readiness",
        vec![
            level(
                1,
                "Idea champion",
                &["Is there at least one person committed to driving the idea forward?"],
            ),
            level(
                2,
                "Initial team formed",
                &["Has an initial team with complementary roles been formed?"],
            ),
            level(
                3,
                "Competence gaps known",
                &["Have you identified the competence gaps the venture must fill?"],
            ),
            level(
                4,
                "Key roles covered",
                &["Are the technical and commercial key roles covered by named people?"],
            ),
            level(
                5,
                "Incentives aligned",
                &["Are founder agreements and incentives in place and aligned?"],
            ),
            level(
                6,
                "Team executing plan",
                &["Is the team executing against a shared development plan?"],
            ),
            level(
                7,
                "Organization forming",
                &["Is a durable organization with defined processes taking shape?"],
            ),
            level(
                8,
                "Organization staffed",
                &["Are all levels of the organization adequately trained and motivated?"],
            ),
            level(
                9,
                "Learning organization",
                &["Do all levels of the organization actively participate in continuous learning and development?"],
            ),
        ],
    )
}

/// FRL - Funding Readiness Level.
fn frl_dimension() -> DimensionSchema {
    dimension(
        "FRL",
        "Funding readiness",
        vec![
            level(
                1,
                "Resource needs sketched",
                &["Have you sketched the resources the venture will need to get started?"],
            ),
            level(
                2,
                "First cost estimate",
                &["Have you estimated initial CAPEX/OPEX at a high level?"],
            ),
            level(
                3,
                "Funding options mapped",
                &["Have you mapped funding options (grants, investors, revenue) for the next stage?"],
            ),
            level(
                4,
                "Financial plan drafted",
                &["Is there a financial plan covering the next development stage?"],
            ),
            level(
                5,
                "First external funding",
                &["Have you secured first external funding or committed resources?"],
            ),
            level(
                6,
                "Runway under control",
                &["Is the runway monitored and sufficient for the committed plan?"],
            ),
            level(
                7,
                "Follow-on funding secured",
                &["Have you secured follow-on funding matched to the growth plan?"],
            ),
            level(
                8,
                "Revenues reduce dependence",
                &["Do revenues materially reduce dependence on external funding?"],
            ),
            level(
                9,
                "Financially sustainable",
                &["Is the venture financially self-sustaining or exit-ready?"],
            ),
        ],
    )
}

// =============================================================================
// TESTS
// =============================================================================
