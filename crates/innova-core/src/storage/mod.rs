//! # Portfolio Storage
//!
//! Project store with two backends:
//! - `Memory`: in-memory maps (fast, volatile; tests and ad hoc CLI use)
//! - `Persistent`: disk-backed ACID storage via [`RedbStore`]
//!
//! The [`Portfolio`] facade owns the backend together with the assessment
//! configuration (schema, checklist catalog, evidence policy) and hands out
//! per-project [`EvaluationSession`]s: load, mutate, save — one synchronous
//! cycle per request.

pub mod redb_store;

pub use redb_store::RedbStore;

use crate::checklist::ChecklistCatalog;
use crate::primitives::MAX_NAME_LENGTH;
use crate::schema::AssessmentSchema;
use crate::session::{EvaluationRecord, EvaluationSession, SessionState};
use crate::types::{InnovaError, ProjectId};
use crate::validator::EvidencePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// PROJECT METADATA
// =============================================================================

/// One portfolio project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Stable project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
}

// =============================================================================
// IN-MEMORY BACKEND
// =============================================================================

/// Volatile project store backing tests and file-less CLI runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: BTreeMap<ProjectId, ProjectMeta>,
    working: BTreeMap<ProjectId, SessionState>,
    history: BTreeMap<ProjectId, Vec<EvaluationRecord>>,
    next_project_id: u64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_project_id: 1,
            ..Self::default()
        }
    }

    fn create_project(&mut self, name: &str) -> ProjectMeta {
        let meta = ProjectMeta {
            id: ProjectId(self.next_project_id),
            name: name.to_string(),
        };
        self.next_project_id = self.next_project_id.saturating_add(1);
        self.projects.insert(meta.id, meta.clone());
        meta
    }

    fn append_history(&mut self, record: &EvaluationRecord) -> u32 {
        let entries = self.history.entry(record.project).or_default();
        let sequence = entries
            .last()
            .map(|r| r.sequence)
            .unwrap_or(0)
            .saturating_add(1);
        let mut stamped = record.clone();
        stamped.sequence = sequence;
        entries.push(stamped);
        sequence
    }
}

// =============================================================================
// BACKEND ENUM
// =============================================================================

/// Storage backend for a [`Portfolio`].
#[derive(Debug)]
pub enum PortfolioBackend {
    /// In-memory store (fast, volatile).
    Memory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

// NOTE: PortfolioBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned.

// =============================================================================
// PORTFOLIO FACADE
// =============================================================================

/// The portfolio: projects plus their evaluation state, behind one backend.
#[derive(Debug)]
pub struct Portfolio {
    backend: PortfolioBackend,
    schema: AssessmentSchema,
    catalog: ChecklistCatalog,
    policy: EvidencePolicy,
}

impl Portfolio {
    /// Create a portfolio over an in-memory store.
    ///
    /// The schema and catalog are validated once here; scoring never
    /// re-checks them.
    pub fn new_in_memory(
        schema: AssessmentSchema,
        catalog: ChecklistCatalog,
        policy: EvidencePolicy,
    ) -> Result<Self, InnovaError> {
        schema.validate()?;
        catalog.validate()?;
        Ok(Self {
            backend: PortfolioBackend::Memory(MemoryStore::new()),
            schema,
            catalog,
            policy,
        })
    }

    /// Create a portfolio over persistent redb storage.
    pub fn with_redb(
        path: impl AsRef<Path>,
        schema: AssessmentSchema,
        catalog: ChecklistCatalog,
        policy: EvidencePolicy,
    ) -> Result<Self, InnovaError> {
        schema.validate()?;
        catalog.validate()?;
        Ok(Self {
            backend: PortfolioBackend::Persistent(RedbStore::open(path)?),
            schema,
            catalog,
            policy,
        })
    }

    /// Default configuration: built-in catalogs, default evidence policy,
    /// in-memory store.
    pub fn with_defaults() -> Result<Self, InnovaError> {
        Self::new_in_memory(
            AssessmentSchema::builtin(),
            ChecklistCatalog::builtin(),
            EvidencePolicy::default(),
        )
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, PortfolioBackend::Persistent(_))
    }

    /// The assessment schema in use.
    #[must_use]
    pub fn schema(&self) -> &AssessmentSchema {
        &self.schema
    }

    /// The checklist catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &ChecklistCatalog {
        &self.catalog
    }

    /// The active evidence policy.
    #[must_use]
    pub fn policy(&self) -> EvidencePolicy {
        self.policy
    }

    // =========================================================================
    // PROJECTS
    // =========================================================================

    /// Create a new project.
    pub fn create_project(&mut self, name: &str) -> Result<ProjectMeta, InnovaError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(InnovaError::InvalidInput("project name is empty".into()));
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(InnovaError::InvalidInput(format!(
                "project name length {} exceeds maximum {}",
                trimmed.len(),
                MAX_NAME_LENGTH
            )));
        }
        match &mut self.backend {
            PortfolioBackend::Memory(store) => Ok(store.create_project(trimmed)),
            PortfolioBackend::Persistent(store) => store.create_project(trimmed),
        }
    }

    /// List all projects.
    pub fn projects(&self) -> Result<Vec<ProjectMeta>, InnovaError> {
        match &self.backend {
            PortfolioBackend::Memory(store) => Ok(store.projects.values().cloned().collect()),
            PortfolioBackend::Persistent(store) => store.projects(),
        }
    }

    /// Fetch one project.
    pub fn project(&self, id: ProjectId) -> Result<ProjectMeta, InnovaError> {
        let found = match &self.backend {
            PortfolioBackend::Memory(store) => store.projects.get(&id).cloned(),
            PortfolioBackend::Persistent(store) => store.project(id)?,
        };
        found.ok_or(InnovaError::UnknownProject(id.0))
    }

    /// Number of projects.
    pub fn project_count(&self) -> Result<usize, InnovaError> {
        match &self.backend {
            PortfolioBackend::Memory(store) => Ok(store.projects.len()),
            PortfolioBackend::Persistent(store) => store.project_count(),
        }
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Load the evaluation session for a project: the saved working state if
    /// one exists, a fresh session otherwise.
    pub fn session(&self, id: ProjectId) -> Result<EvaluationSession, InnovaError> {
        self.project(id)?;
        let saved = match &self.backend {
            PortfolioBackend::Memory(store) => store.working.get(&id).cloned(),
            PortfolioBackend::Persistent(store) => store.load_working(id)?,
        };
        Ok(match saved {
            Some(state) => EvaluationSession::from_state(
                state,
                self.schema.clone(),
                self.catalog.clone(),
                self.policy,
            ),
            None => EvaluationSession::new(
                id,
                self.schema.clone(),
                self.catalog.clone(),
                self.policy,
            ),
        })
    }

    /// Save a session's working state back to the store.
    pub fn save_session(&mut self, session: &EvaluationSession) -> Result<(), InnovaError> {
        let state = session.state();
        match &mut self.backend {
            PortfolioBackend::Memory(store) => {
                store.working.insert(state.project, state);
                Ok(())
            }
            PortfolioBackend::Persistent(store) => store.save_working(&state),
        }
    }

    /// Finalize the project's current working state: append the evaluation
    /// to history and return the stamped record.
    pub fn finalize(
        &mut self,
        id: ProjectId,
        label: &str,
    ) -> Result<EvaluationRecord, InnovaError> {
        let session = self.session(id)?;
        let mut record = session.finalize(label);
        let sequence = match &mut self.backend {
            PortfolioBackend::Memory(store) => store.append_history(&record),
            PortfolioBackend::Persistent(store) => store.append_history(&record)?,
        };
        record.sequence = sequence;
        Ok(record)
    }

    /// Fetch a project's finalized history, newest first.
    pub fn history(&self, id: ProjectId) -> Result<Vec<EvaluationRecord>, InnovaError> {
        self.project(id)?;
        match &self.backend {
            PortfolioBackend::Memory(store) => {
                let mut records = store.history.get(&id).cloned().unwrap_or_default();
                records.reverse();
                Ok(records)
            }
            PortfolioBackend::Persistent(store) => store.history(id),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Answer, DimensionId, Evidence, LevelRank, QuestionIndex};

    fn portfolio() -> Portfolio {
        Portfolio::with_defaults().expect("portfolio")
    }

    #[test]
    fn create_project_validates_name() {
        let mut p = portfolio();
        assert!(matches!(
            p.create_project("   "),
            Err(InnovaError::InvalidInput(_))
        ));
        let meta = p.create_project("  Solar membrane  ").expect("create");
        assert_eq!(meta.name, "Solar membrane");
        assert_eq!(meta.id, ProjectId(1));
    }

    #[test]
    fn unknown_project_errors() {
        let p = portfolio();
        assert!(matches!(
            p.session(ProjectId(42)),
            Err(InnovaError::UnknownProject(42))
        ));
        assert!(matches!(
            p.history(ProjectId(42)),
            Err(InnovaError::UnknownProject(42))
        ));
    }

    #[test]
    fn session_load_mutate_save_cycle() {
        let mut p = portfolio();
        let meta = p.create_project("Solar membrane").expect("create");

        let mut session = p.session(meta.id).expect("session");
        session
            .respond_question(
                &DimensionId::new("CRL"),
                LevelRank(1),
                QuestionIndex(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");
        p.save_session(&session).expect("save");

        // A later request sees the saved state.
        let reloaded = p.session(meta.id).expect("reload");
        assert_eq!(reloaded.dimension_score(&DimensionId::new("CRL")), 1);
    }

    #[test]
    fn finalize_appends_history() {
        let mut p = portfolio();
        let meta = p.create_project("Solar membrane").expect("create");

        let first = p.finalize(meta.id, "intake").expect("finalize");
        let second = p.finalize(meta.id, "review").expect("finalize");
        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);

        let history = p.history(meta.id).expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].label, "review");
        assert_eq!(history[1].label, "intake");
    }

    #[test]
    fn redb_backend_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("portfolio.db");

        let meta = {
            let mut p = Portfolio::with_redb(
                &path,
                AssessmentSchema::builtin(),
                ChecklistCatalog::builtin(),
                EvidencePolicy::default(),
            )
            .expect("portfolio");
            assert!(p.is_persistent());
            let meta = p.create_project("Solar membrane").expect("create");
            let mut session = p.session(meta.id).expect("session");
            session
                .respond_question(
                    &DimensionId::new("CRL"),
                    LevelRank(1),
                    QuestionIndex(1),
                    Some(Answer::True),
                    Evidence::new("Interviewed 5 users"),
                )
                .expect("respond");
            p.save_session(&session).expect("save");
            meta
        };

        // Reopen from disk; everything survives.
        let p = Portfolio::with_redb(
            &path,
            AssessmentSchema::builtin(),
            ChecklistCatalog::builtin(),
            EvidencePolicy::default(),
        )
        .expect("reopen");
        let session = p.session(meta.id).expect("session");
        assert_eq!(session.dimension_score(&DimensionId::new("CRL")), 1);
    }
}
