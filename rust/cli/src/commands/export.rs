//! Session history export.
//!
//! Writes the saved history of one game as CSV (one row per score change),
//! a JSON snapshot, or a SQLite database with `players`, `rounds` and
//! `score_changes` tables.

use std::io::Write;
use std::path::Path;

use diemso_engine::session::{Game, SessionState};
use diemso_engine::storage::SessionStore;

use crate::cli::ExportFormat;
use crate::commands::load_session;
use crate::error::CliError;
use crate::io_utils::{csv_field, ensure_parent_dir};
use crate::ui;

pub const SQLITE_BACKOFF_ENV: &str = "DIEMSO_SQLITE_BACKOFF_MS";
pub const SQLITE_MAX_ATTEMPTS_ENV: &str = "DIEMSO_SQLITE_MAX_ATTEMPTS";

/// Handles the export command.
///
/// Rounds are written oldest first so row order matches play order.
pub fn handle_export_command(
    game: Game,
    format: ExportFormat,
    output: &Path,
    store: &dyn SessionStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let state = load_session(store, game, err)?;
    ensure_parent_dir(output).map_err(|e| {
        let _ = ui::write_error(err, &e);
        CliError::InvalidInput(e)
    })?;

    match format {
        ExportFormat::Csv => export_csv(&state, output, err)?,
        ExportFormat::Json => export_json(&state, output, err)?,
        ExportFormat::Sqlite => export_sqlite(&state, output, err)?,
    }
    writeln!(
        out,
        "Exported {} round(s) to {} ({}).",
        state.history().len(),
        output.display(),
        format.as_str()
    )?;
    Ok(())
}

fn player_name<'a>(state: &'a SessionState, id: &'a str) -> &'a str {
    state
        .players()
        .iter()
        .find(|p| p.id().as_str() == id)
        .map(|p| p.name())
        .unwrap_or(id)
}

/// Export to CSV format
fn export_csv(state: &SessionState, output: &Path, err: &mut dyn Write) -> Result<(), CliError> {
    let mut w = std::fs::File::create(output)
        .map(std::io::BufWriter::new)
        .map_err(|e| {
            let _ = ui::write_error(err, &format!("Failed to write {}: {}", output.display(), e));
            CliError::Io(e)
        })?;
    writeln!(w, "round_id,timestamp,description,player_id,player_name,delta")?;
    for record in state.history().iter().rev() {
        for (id, delta) in record.score_changes.iter() {
            writeln!(
                w,
                "{},{},{},{},{},{}",
                record.id,
                record.timestamp,
                csv_field(&record.description),
                csv_field(id.as_str()),
                csv_field(player_name(state, id.as_str())),
                delta
            )?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export the full session snapshot as pretty JSON
fn export_json(state: &SessionState, output: &Path, err: &mut dyn Write) -> Result<(), CliError> {
    let s = serde_json::to_string_pretty(state).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to serialize JSON: {}", e));
        CliError::InvalidInput(format!("Failed to serialize JSON: {}", e))
    })?;
    std::fs::write(output, s).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to write {}: {}", output.display(), e));
        CliError::Io(e)
    })?;
    Ok(())
}

/// Export to SQLite format
fn export_sqlite(state: &SessionState, output: &Path, err: &mut dyn Write) -> Result<(), CliError> {
    enum ExportAttemptError {
        Busy(String),
        Fatal(String),
    }

    fn sqlite_busy(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(info, _)
                if matches!(
                    info.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                )
        )
    }

    /// Classifies a rusqlite error as retryable or fatal.
    fn classify(context: &str) -> impl Fn(rusqlite::Error) -> ExportAttemptError + '_ {
        move |e| {
            if sqlite_busy(&e) {
                ExportAttemptError::Busy(format!("{}: {}", context, e))
            } else {
                ExportAttemptError::Fatal(format!("Failed to {}: {}", context, e))
            }
        }
    }

    fn export_sqlite_attempt(state: &SessionState, output: &Path) -> Result<(), ExportAttemptError> {
        let mut conn = rusqlite::Connection::open(output)
            .map_err(classify(&format!("open {}", output.display())))?;
        let tx = conn.transaction().map_err(classify("start transaction"))?;

        tx.execute_batch(
            "DROP TABLE IF EXISTS score_changes;
             DROP TABLE IF EXISTS rounds;
             DROP TABLE IF EXISTS players;
             CREATE TABLE players (
                 id TEXT NOT NULL PRIMARY KEY,
                 name TEXT NOT NULL,
                 score INTEGER NOT NULL
             );
             CREATE TABLE rounds (
                 id TEXT NOT NULL PRIMARY KEY,
                 seq INTEGER NOT NULL,
                 timestamp INTEGER NOT NULL,
                 description TEXT NOT NULL
             );
             CREATE TABLE score_changes (
                 round_id TEXT NOT NULL REFERENCES rounds(id),
                 player_id TEXT NOT NULL,
                 delta INTEGER NOT NULL,
                 PRIMARY KEY (round_id, player_id)
             );",
        )
        .map_err(classify("create schema"))?;

        {
            let mut insert_player = tx
                .prepare("INSERT INTO players (id, name, score) VALUES (?1, ?2, ?3)")
                .map_err(classify("prepare insert"))?;
            for p in state.players() {
                insert_player
                    .execute(rusqlite::params![p.id().as_str(), p.name(), p.score()])
                    .map_err(classify("insert player"))?;
            }

            let mut insert_round = tx
                .prepare("INSERT INTO rounds (id, seq, timestamp, description) VALUES (?1, ?2, ?3, ?4)")
                .map_err(classify("prepare insert"))?;
            let mut insert_change = tx
                .prepare("INSERT INTO score_changes (round_id, player_id, delta) VALUES (?1, ?2, ?3)")
                .map_err(classify("prepare insert"))?;
            for (seq, record) in state.history().iter().rev().enumerate() {
                insert_round
                    .execute(rusqlite::params![
                        &record.id,
                        seq as i64 + 1,
                        record.timestamp,
                        &record.description
                    ])
                    .map_err(classify("insert round"))?;
                for (id, delta) in record.score_changes.iter() {
                    insert_change
                        .execute(rusqlite::params![&record.id, id.as_str(), delta])
                        .map_err(classify("insert score change"))?;
                }
            }
        }

        tx.commit().map_err(classify("commit export"))?;
        Ok(())
    }

    let backoff_ms: u64 = std::env::var(SQLITE_BACKOFF_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);
    let max_attempts: u32 = std::env::var(SQLITE_MAX_ATTEMPTS_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50);

    if max_attempts == 0 {
        let msg = format!("{} must be >= 1 (got 0)", SQLITE_MAX_ATTEMPTS_ENV);
        ui::write_error(err, &msg)?;
        return Err(CliError::Config(msg));
    }

    let mut attempt = 1;
    loop {
        match export_sqlite_attempt(state, output) {
            Ok(()) => return Ok(()),
            Err(ExportAttemptError::Busy(msg)) if attempt < max_attempts => {
                tracing::debug!(attempt, reason = %msg, "sqlite busy, retrying");
                std::thread::sleep(std::time::Duration::from_millis(
                    backoff_ms * attempt as u64,
                ));
                attempt += 1;
            }
            Err(ExportAttemptError::Busy(msg)) => {
                let msg = format!("SQLite busy after {} attempt(s): {}", attempt, msg);
                ui::write_error(err, &msg)?;
                return Err(CliError::Config(msg));
            }
            Err(ExportAttemptError::Fatal(msg)) => {
                ui::write_error(err, &msg)?;
                return Err(CliError::Config(msg));
            }
        }
    }
}
