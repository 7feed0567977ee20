//! # redb-backed Portfolio Storage
//!
//! Disk-backed project store using the redb embedded database:
//! - ACID transactions, crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! The store keeps three kinds of records per project: the project row
//! itself, the live working evaluation state, and an append-only history of
//! finalized evaluations keyed by a monotonic per-project sequence. Every
//! write is a single-record transaction; no cross-record coordination is
//! needed at this scale.

use crate::session::{EvaluationRecord, SessionState};
use crate::storage::ProjectMeta;
use crate::types::{InnovaError, ProjectId};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for projects: ProjectId(u64) -> serialized ProjectMeta bytes
const PROJECTS: TableDefinition<u64, &[u8]> = TableDefinition::new("projects");

/// Table for live working state: ProjectId(u64) -> serialized SessionState bytes
const WORKING: TableDefinition<u64, &[u8]> = TableDefinition::new("working");

/// Table for finalized history: (project_id, sequence) -> serialized EvaluationRecord bytes
const HISTORY: TableDefinition<(u64, u32), &[u8]> = TableDefinition::new("history");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// A disk-backed portfolio store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
    /// Next available project ID.
    next_project_id: u64,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("next_project_id", &self.next_project_id)
            .finish_non_exhaustive()
    }
}

fn io_err(e: impl std::fmt::Display) -> InnovaError {
    InnovaError::IoError(e.to_string())
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, InnovaError> {
    postcard::to_stdvec(value).map_err(|e| InnovaError::SerializationError(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, InnovaError> {
    postcard::from_bytes(bytes).map_err(|e| InnovaError::DeserializationError(e.to_string()))
}

impl RedbStore {
    /// Open or create a portfolio database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InnovaError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(PROJECTS).map_err(io_err)?;
            let _ = write_txn.open_table(WORKING).map_err(io_err)?;
            let _ = write_txn.open_table(HISTORY).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        // Load metadata
        let read_txn = db.begin_read().map_err(io_err)?;
        let next_project_id = {
            let table = read_txn.open_table(METADATA).map_err(io_err)?;
            table
                .get("next_project_id")
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(1)
        };

        Ok(Self {
            db,
            next_project_id,
        })
    }

    /// Create a new project, assigning the next identifier.
    pub fn create_project(&mut self, name: &str) -> Result<ProjectMeta, InnovaError> {
        let meta = ProjectMeta {
            id: ProjectId(self.next_project_id),
            name: name.to_string(),
        };
        let bytes = encode(&meta)?;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(PROJECTS).map_err(io_err)?;
            table
                .insert(meta.id.0, bytes.as_slice())
                .map_err(io_err)?;
            let mut metadata = write_txn.open_table(METADATA).map_err(io_err)?;
            metadata
                .insert("next_project_id", self.next_project_id.saturating_add(1))
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;

        self.next_project_id = self.next_project_id.saturating_add(1);
        Ok(meta)
    }

    /// List all projects in id order.
    pub fn projects(&self) -> Result<Vec<ProjectMeta>, InnovaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(PROJECTS).map_err(io_err)?;

        let mut projects = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            projects.push(decode(value.value())?);
        }
        Ok(projects)
    }

    /// Fetch one project.
    pub fn project(&self, id: ProjectId) -> Result<Option<ProjectMeta>, InnovaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(PROJECTS).map_err(io_err)?;

        match table.get(id.0).map_err(io_err)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Load the live working state for a project, if any was saved.
    pub fn load_working(&self, id: ProjectId) -> Result<Option<SessionState>, InnovaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(WORKING).map_err(io_err)?;

        match table.get(id.0).map_err(io_err)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Save the live working state for a project (single-record upsert).
    pub fn save_working(&mut self, state: &SessionState) -> Result<(), InnovaError> {
        let bytes = encode(state)?;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(WORKING).map_err(io_err)?;
            table
                .insert(state.project.0, bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    /// Append a finalized evaluation to the project's history.
    ///
    /// Assigns and returns the next monotonic sequence for the project.
    pub fn append_history(&mut self, record: &EvaluationRecord) -> Result<u32, InnovaError> {
        let project = record.project.0;

        let write_txn = self.db.begin_write().map_err(io_err)?;
        let sequence = {
            let mut table = write_txn.open_table(HISTORY).map_err(io_err)?;

            let last = table
                .range((project, 0)..=(project, u32::MAX))
                .map_err(io_err)?
                .next_back()
                .transpose()
                .map_err(io_err)?
                .map(|(key, _)| key.value().1)
                .unwrap_or(0);
            let sequence = last.saturating_add(1);

            let mut stamped = record.clone();
            stamped.sequence = sequence;
            let bytes = encode(&stamped)?;
            table
                .insert((project, sequence), bytes.as_slice())
                .map_err(io_err)?;
            sequence
        };
        write_txn.commit().map_err(io_err)?;
        Ok(sequence)
    }

    /// Fetch a project's finalized history, newest first.
    pub fn history(&self, id: ProjectId) -> Result<Vec<EvaluationRecord>, InnovaError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(HISTORY).map_err(io_err)?;

        let mut records = Vec::new();
        for entry in table.range((id.0, 0)..=(id.0, u32::MAX)).map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            records.push(decode(value.value())?);
        }
        records.reverse();
        Ok(records)
    }

    /// Number of projects in the store.
    pub fn project_count(&self) -> Result<usize, InnovaError> {
        Ok(self.projects()?.len())
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), InnovaError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
