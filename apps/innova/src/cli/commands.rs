//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::AppConfig;
use innova_core::{
    record_to_bytes, snapshot_checksum, InnovaError, Portfolio, ProjectId, ResponseRow,
    primitives::MAX_IMPORT_ROWS,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for row imports (50 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_IMPORT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), InnovaError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| InnovaError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(InnovaError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path to resolve symlinks and "..", ensures it exists,
/// and ensures it is a regular file. This prevents path traversal through
/// values like "../../../etc/passwd".
fn validate_file_path(path: &Path) -> Result<PathBuf, InnovaError> {
    let canonical = path.canonicalize().map_err(|e| {
        InnovaError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(InnovaError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output file path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, InnovaError> {
    let parent = path.parent().unwrap_or(Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        InnovaError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(InnovaError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| InnovaError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// COMMAND CONTEXT
// =============================================================================

/// Resolved configuration shared by all commands.
pub struct CommandContext {
    pub database: PathBuf,
    pub backend: String,
    pub json_mode: bool,
    pub config: AppConfig,
    config_dir: Option<PathBuf>,
}

impl CommandContext {
    /// Build the context from parsed CLI arguments, loading the config file
    /// when one was given.
    pub fn from_cli(cli: &super::Cli) -> Result<Self, InnovaError> {
        let (config, config_dir) = match &cli.config {
            Some(path) => {
                let validated = validate_file_path(path)?;
                let dir = validated.parent().map(Path::to_path_buf);
                (AppConfig::load(&validated)?, dir)
            }
            None => (AppConfig::default(), None),
        };

        Ok(Self {
            database: cli.database.clone(),
            backend: cli.backend.clone(),
            json_mode: cli.json_mode,
            config,
            config_dir,
        })
    }

    /// Open the portfolio with the configured backend and catalogs.
    pub fn open_portfolio(&self) -> Result<Portfolio, InnovaError> {
        let schema = self.config.resolve_schema(self.config_dir.as_deref())?;
        let catalog = self.config.resolve_checklist(self.config_dir.as_deref())?;
        let policy = self.config.policy();

        match self.backend.as_str() {
            "memory" => Portfolio::new_in_memory(schema, catalog, policy),
            _ => Portfolio::with_redb(&self.database, schema, catalog, policy),
        }
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    ctx: &CommandContext,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), InnovaError> {
    let portfolio = ctx.open_portfolio()?;
    let host = host.unwrap_or_else(|| ctx.config.server.host.clone());
    let port = port.unwrap_or(ctx.config.server.port);

    println!("Innova Portfolio Maturity Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", ctx.backend);
    println!("  Database: {:?}", ctx.database);
    println!();
    println!("Endpoints:");
    println!("  GET  /health             - Health check");
    println!("  GET  /status             - Portfolio status");
    println!("  GET  /projects           - List projects");
    println!("  POST /projects           - Create a project");
    println!("  POST /response           - Submit a level response");
    println!("  POST /review             - Flag a level for review");
    println!("  POST /checklist          - Answer a checklist item");
    println!("  GET  /checklist/summary  - Checklist summary");
    println!("  GET  /scorecard          - Maturity scorecard");
    println!("  POST /import             - Import response rows");
    println!("  POST /finalize           - Finalize into history");
    println!("  GET  /history            - Finalized evaluations");
    println!("  POST /export             - Export canonical snapshot");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, portfolio).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show portfolio status.
pub fn cmd_status(ctx: &CommandContext) -> Result<(), InnovaError> {
    let portfolio = ctx.open_portfolio()?;
    let project_count = portfolio.project_count()?;
    let dimensions = portfolio.schema().dimensions.len();
    let policy = portfolio.policy();

    if ctx.json_mode {
        let output = serde_json::json!({
            "database": ctx.database.to_string_lossy(),
            "backend": ctx.backend,
            "project_count": project_count,
            "dimensions": dimensions,
            "evidence_strict": policy.strict,
            "evidence_min_chars": policy.min_chars,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Innova Portfolio Status");
    println!("=======================");
    println!("Database: {:?}", ctx.database);
    println!("Backend:  {}", ctx.backend);
    println!();
    println!("Projects:   {}", project_count);
    println!("Dimensions: {}", dimensions);
    println!(
        "Evidence:   {}",
        if policy.strict {
            format!("strict (min {} chars)", policy.min_chars)
        } else {
            "non-blank".to_string()
        }
    );

    Ok(())
}

// =============================================================================
// PROJECTS COMMAND
// =============================================================================

/// List projects, or create one.
pub fn cmd_projects(ctx: &CommandContext, create: Option<String>) -> Result<(), InnovaError> {
    let mut portfolio = ctx.open_portfolio()?;

    if let Some(name) = create {
        let meta = portfolio.create_project(&name)?;
        if ctx.json_mode {
            let output = serde_json::json!({ "id": meta.id.0, "name": meta.name });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_default()
            );
        } else {
            println!("Created project {} ({})", meta.id.0, meta.name);
        }
        return Ok(());
    }

    let projects = portfolio.projects()?;
    if ctx.json_mode {
        let output: Vec<_> = projects
            .iter()
            .map(|p| serde_json::json!({ "id": p.id.0, "name": p.name }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects. Create one with: innova projects --create <name>");
        return Ok(());
    }
    println!("Projects");
    println!("========");
    for p in projects {
        println!("  {:>4}  {}", p.id.0, p.name);
    }
    Ok(())
}

// =============================================================================
// SCORE COMMAND
// =============================================================================

/// Show a project's maturity scorecard.
pub fn cmd_score(ctx: &CommandContext, project: u64) -> Result<(), InnovaError> {
    let portfolio = ctx.open_portfolio()?;
    let meta = portfolio.project(ProjectId(project))?;
    let session = portfolio.session(meta.id)?;
    let card = session.scorecard();

    if ctx.json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&card).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Scorecard: {} (project {})", meta.name, meta.id.0);
    println!("==========");
    for dim in &card.dimensions {
        println!(
            "  {:<6} {:>2}/{:<2}  in-calc {:>2}  pending {:>2}  review {:>2}  ({})",
            dim.id.as_str(),
            dim.score,
            dim.top_rank,
            dim.in_calculation,
            dim.pending,
            dim.under_review,
            dim.name
        );
    }
    println!();
    println!("Overall: {}", card.overall);
    println!("Stage:   {}", card.stage.current);
    if let Some(next) = card.stage.next {
        println!(
            "Next:    {} ({}% - overall {} of {} needed)",
            next, card.stage.percent, card.stage.score_current, card.stage.score_needed
        );
    } else {
        println!("Terminal stage reached (S3)");
    }
    Ok(())
}

// =============================================================================
// CHECKLIST COMMAND
// =============================================================================

/// Show a project's checklist summary.
pub fn cmd_checklist(ctx: &CommandContext, project: u64) -> Result<(), InnovaError> {
    let portfolio = ctx.open_portfolio()?;
    let meta = portfolio.project(ProjectId(project))?;
    let session = portfolio.session(meta.id)?;
    let summary = session.checklist_summary();

    if ctx.json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Checklist: {} (project {})", meta.name, meta.id.0);
    println!("==========");
    for phase in &summary.phases {
        println!(
            "  Phase {} {:<28} {:>3}  met {:>2}  wip {:>2}  not-met {:>2}  open {:>2}  [{:?}]",
            phase.id,
            phase.name,
            phase.score_centi,
            phase.met,
            phase.in_progress,
            phase.not_met,
            phase.unanswered,
            phase.light
        );
    }
    println!();
    println!(
        "Overall: {} [{:?}]  answered {}/{}",
        summary.overall_centi, summary.light, summary.answered, summary.total
    );
    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import response rows from a file.
pub fn cmd_import(
    ctx: &CommandContext,
    project: u64,
    file: &Path,
    format: &str,
) -> Result<(), InnovaError> {
    tracing::info!("Importing from {:?} (format: {})", file, format);

    let mut portfolio = ctx.open_portfolio()?;
    let meta = portfolio.project(ProjectId(project))?;

    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| InnovaError::IoError(format!("Read file: {}", e)))?;

    let rows = match format {
        "json" => {
            let rows: Vec<ResponseRow> = serde_json::from_slice(&contents)
                .map_err(|e| InnovaError::DeserializationError(format!("rows json: {e}")))?;
            rows
        }
        "text" => parse_text_rows(&String::from_utf8_lossy(&contents)),
        _ => {
            return Err(InnovaError::InvalidInput(format!(
                "Unknown format: {}. Use: json, text",
                format
            )));
        }
    };

    if rows.len() > MAX_IMPORT_ROWS {
        return Err(InnovaError::InvalidInput(format!(
            "Row count {} exceeds maximum {}",
            rows.len(),
            MAX_IMPORT_ROWS
        )));
    }

    let mut session = portfolio.session(meta.id)?;
    let report = session.apply_rows(&rows)?;
    portfolio.save_session(&session)?;

    if ctx.json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Imported {} of {} rows ({} blank, {} invalid)",
        report.applied, report.total, report.blank, report.invalid
    );
    for error in report.errors.iter().take(10) {
        println!("  row {}: {}", error.row, error.reason);
    }
    if report.errors.len() > 10 {
        println!("  ... and {} more", report.errors.len() - 10);
    }
    Ok(())
}

/// Parse `:`-separated text rows: `DIMENSION:LEVEL:QUESTION:ANSWER:EVIDENCE`.
///
/// The question field is `-` for single-answer levels; the evidence field
/// may itself contain colons. Lines with fewer than four fields are skipped
/// here and surface in the import report as blanks would.
fn parse_text_rows(text: &str) -> Vec<ResponseRow> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() < 4 {
            continue;
        }
        let Ok(level) = parts[1].trim().parse::<u8>() else {
            continue;
        };
        let question = match parts[2].trim() {
            "-" | "" => None,
            value => value.parse::<u8>().ok(),
        };
        let evidence = if parts.len() > 4 {
            parts[4..].join(":")
        } else {
            String::new()
        };
        rows.push(ResponseRow {
            dimension: parts[0].trim().to_string(),
            level,
            question,
            prompt: None,
            answer: parts[3].trim().to_string(),
            evidence: evidence.trim().to_string(),
        });
    }
    rows
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export a project's evaluation.
pub fn cmd_export(
    ctx: &CommandContext,
    project: u64,
    output: &Path,
    format: &str,
) -> Result<(), InnovaError> {
    let validated_output = validate_output_path(output)?;

    let portfolio = ctx.open_portfolio()?;
    let meta = portfolio.project(ProjectId(project))?;
    let session = portfolio.session(meta.id)?;

    let data = match format {
        "rows" => {
            let rows = session.export_rows();
            serde_json::to_vec_pretty(&rows)
                .map_err(|e| InnovaError::SerializationError(e.to_string()))?
        }
        "snapshot" => {
            let record = session.finalize("export");
            let data = record_to_bytes(&record)?;
            println!("Checksum: {}", snapshot_checksum(&data));
            data
        }
        _ => {
            return Err(InnovaError::InvalidInput(format!(
                "Unknown format: {}. Use: rows, snapshot",
                format
            )));
        }
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| InnovaError::IoError(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);
    Ok(())
}

// =============================================================================
// FINALIZE COMMAND
// =============================================================================

/// Finalize the current evaluation into the project's history.
pub fn cmd_finalize(ctx: &CommandContext, project: u64, label: &str) -> Result<(), InnovaError> {
    let mut portfolio = ctx.open_portfolio()?;
    let record = portfolio.finalize(ProjectId(project), label)?;

    if ctx.json_mode {
        let output = serde_json::json!({
            "project": record.project.0,
            "sequence": record.sequence,
            "label": record.label,
            "overall": record.overall,
            "scores": record.scores,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Finalized evaluation #{} for project {} (overall {})",
        record.sequence, record.project.0, record.overall
    );
    Ok(())
}

// =============================================================================
// HISTORY COMMAND
// =============================================================================

/// Show a project's finalized evaluations.
pub fn cmd_history(ctx: &CommandContext, project: u64) -> Result<(), InnovaError> {
    let portfolio = ctx.open_portfolio()?;
    let records = portfolio.history(ProjectId(project))?;

    if ctx.json_mode {
        let output: Vec<_> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "sequence": r.sequence,
                    "label": r.label,
                    "overall": r.overall,
                    "scores": r.scores,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if records.is_empty() {
        println!("No finalized evaluations for project {}", project);
        return Ok(());
    }
    println!("History for project {}", project);
    println!("======================");
    for r in records {
        let label = if r.label.is_empty() { "-" } else { &r.label };
        println!("  #{:<4} overall {:>2}  {}", r.sequence, r.overall, label);
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new portfolio database.
pub fn cmd_init(ctx: &CommandContext, force: bool) -> Result<(), InnovaError> {
    if ctx.database.exists() && !force {
        return Err(InnovaError::InvalidInput(
            "Database already exists. Use --force to overwrite.".to_string(),
        ));
    }
    if ctx.database.exists() {
        std::fs::remove_file(&ctx.database)
            .map_err(|e| InnovaError::IoError(format!("Remove database: {}", e)))?;
    }

    let _portfolio = ctx.open_portfolio()?;
    println!("Initialized new portfolio database at {:?}", ctx.database);
    Ok(())
}

// =============================================================================
// HASH COMMAND
// =============================================================================

/// Compute BLAKE3 hash of a project's canonical snapshot.
pub fn cmd_hash(ctx: &CommandContext, project: u64) -> Result<(), InnovaError> {
    let portfolio = ctx.open_portfolio()?;
    let meta = portfolio.project(ProjectId(project))?;
    let session = portfolio.session(meta.id)?;

    let record = session.finalize("hash");
    let data = record_to_bytes(&record)?;
    let hash = innova_core::snapshot_hash(&data);

    if ctx.json_mode {
        let output = serde_json::json!({
            "project": meta.id.0,
            "bytes": data.len(),
            "blake3": hash,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Project:  {} ({})", meta.id.0, meta.name);
    println!("Snapshot: {} bytes", data.len());
    println!("BLAKE3:   {}", hash);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rows_parse_fields() {
        let text = "\
# comment line
CRL:1:1:TRUE:Interviewed 5 users
IPRL:4:-:VERDADERO:Filing drafted: with counsel
BRL:2::FALSO:
short:line
";
        let rows = parse_text_rows(text);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].dimension, "CRL");
        assert_eq!(rows[0].level, 1);
        assert_eq!(rows[0].question, Some(1));
        assert_eq!(rows[0].evidence, "Interviewed 5 users");

        // Single-answer marker and colon inside evidence both survive.
        assert_eq!(rows[1].question, None);
        assert_eq!(rows[1].evidence, "Filing drafted: with counsel");

        assert_eq!(rows[2].question, None);
        assert_eq!(rows[2].answer, "FALSO");
    }
}
