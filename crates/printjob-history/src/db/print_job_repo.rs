//! Print job repository: aggregate persistence for the `print_jobs`,
//! `filaments` and `temperatures` tables.
//!
//! A print job and its owned rows are always written inside one transaction,
//! so a failed write leaves the tables exactly as they were.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DatabaseError};
use crate::model::{FilamentUsage, PrintJob, PrintOutcome, TemperatureSample};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// ─── Helpers ────────────────────────────────────────────────────────────────

fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(column: &'static str, s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|e| DatabaseError::Decode {
        column,
        reason: format!("'{}': {}", s, e),
    })
}

// ─── Rows ───────────────────────────────────────────────────────────────────

/// A raw `print_jobs` row.
#[derive(Debug, Clone)]
struct PrintJobRow {
    id: i64,
    user_name: Option<String>,
    file_name: Option<String>,
    file_path: Option<String>,
    file_size: Option<i64>,
    print_start: String,
    print_end: Option<String>,
    print_status_result: Option<String>,
    printed_layers: Option<String>,
    printed_height: Option<String>,
    note_text: Option<String>,
    note_delta: Option<String>,
    note_html: Option<String>,
}

impl PrintJobRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_name: row.get("user_name")?,
            file_name: row.get("file_name")?,
            file_path: row.get("file_path")?,
            file_size: row.get("file_size")?,
            print_start: row.get("print_start")?,
            print_end: row.get("print_end")?,
            print_status_result: row.get("print_status_result")?,
            printed_layers: row.get("printed_layers")?,
            printed_height: row.get("printed_height")?,
            note_text: row.get("note_text")?,
            note_delta: row.get("note_delta")?,
            note_html: row.get("note_html")?,
        })
    }

    fn into_entity(
        self,
        filament: Option<FilamentUsage>,
        temperature_samples: Vec<TemperatureSample>,
    ) -> Result<PrintJob, DatabaseError> {
        let started_at = parse_timestamp("print_start", &self.print_start)?;
        let ended_at = self
            .print_end
            .as_deref()
            .map(|s| parse_timestamp("print_end", s))
            .transpose()?;
        let outcome = self
            .print_status_result
            .as_deref()
            .map(|s| {
                s.parse::<PrintOutcome>().map_err(|reason| DatabaseError::Decode {
                    column: "print_status_result",
                    reason,
                })
            })
            .transpose()?;

        Ok(PrintJob {
            id: Some(self.id),
            file_name: self.file_name,
            file_path_label: self.file_path,
            file_size_bytes: self.file_size,
            owner_user_name: self.user_name,
            started_at,
            ended_at,
            outcome,
            printed_layers_label: self.printed_layers,
            printed_height_label: self.printed_height,
            note_text: self.note_text,
            note_rich_delta: self.note_delta,
            note_rich_html: self.note_html,
            filament,
            temperature_samples,
        })
    }
}

fn filament_from_row(row: &Row<'_>) -> Result<(i64, FilamentUsage), rusqlite::Error> {
    Ok((
        row.get("print_job_id")?,
        FilamentUsage {
            calculated_length_mm: row.get("calculated_length")?,
            used_length_mm: row.get("used_length")?,
            spool_name: row.get("spool_name")?,
            spool_cost: row.get("spool_cost")?,
            spool_cost_unit: row.get("spool_cost_unit")?,
            spool_weight_g: row.get("spool_weight")?,
            material_vendor: row.get("profile_vendor")?,
            material_type: row.get("material")?,
            filament_diameter_mm: row.get("diameter")?,
            filament_density: row.get("density")?,
        },
    ))
}

fn temperature_from_row(row: &Row<'_>) -> Result<(i64, TemperatureSample), rusqlite::Error> {
    Ok((
        row.get("print_job_id")?,
        TemperatureSample {
            sensor_name: row.get("sensor_name")?,
            sensor_value_celsius: row.get("sensor_value")?,
        },
    ))
}

// ─── Writes ─────────────────────────────────────────────────────────────────

fn insert_parent(conn: &Connection, job: &PrintJob) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO print_jobs (user_name, file_name, file_path, file_size, print_start,
         print_end, print_status_result, printed_layers, printed_height, note_text,
         note_delta, note_html)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            job.owner_user_name,
            job.file_name,
            job.file_path_label,
            job.file_size_bytes,
            format_timestamp(&job.started_at),
            job.ended_at.as_ref().map(format_timestamp),
            job.outcome.map(|o| o.as_str()),
            job.printed_layers_label,
            job.printed_height_label,
            job.note_text,
            job.note_rich_delta,
            job.note_rich_html,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn update_parent(conn: &Connection, id: i64, job: &PrintJob) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE print_jobs SET user_name=?2, file_name=?3, file_path=?4, file_size=?5,
         print_start=?6, print_end=?7, print_status_result=?8, printed_layers=?9,
         printed_height=?10, note_text=?11, note_delta=?12, note_html=?13
         WHERE id=?1",
        params![
            id,
            job.owner_user_name,
            job.file_name,
            job.file_path_label,
            job.file_size_bytes,
            format_timestamp(&job.started_at),
            job.ended_at.as_ref().map(format_timestamp),
            job.outcome.map(|o| o.as_str()),
            job.printed_layers_label,
            job.printed_height_label,
            job.note_text,
            job.note_rich_delta,
            job.note_rich_html,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound { id });
    }
    Ok(())
}

fn delete_children(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM filaments WHERE print_job_id = ?1", params![id])?;
    conn.execute("DELETE FROM temperatures WHERE print_job_id = ?1", params![id])?;
    Ok(())
}

fn insert_children(conn: &Connection, id: i64, job: &PrintJob) -> Result<(), DatabaseError> {
    if let Some(ref f) = job.filament {
        conn.execute(
            "INSERT INTO filaments (print_job_id, calculated_length, used_length, spool_name,
             spool_cost, spool_cost_unit, spool_weight, profile_vendor, material, diameter,
             density)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                f.calculated_length_mm,
                f.used_length_mm,
                f.spool_name,
                f.spool_cost,
                f.spool_cost_unit,
                f.spool_weight_g,
                f.material_vendor,
                f.material_type,
                f.filament_diameter_mm,
                f.filament_density,
            ],
        )?;
    }

    let mut stmt = conn.prepare(
        "INSERT INTO temperatures (print_job_id, sensor_name, sensor_value) VALUES (?1, ?2, ?3)",
    )?;
    for sample in &job.temperature_samples {
        stmt.execute(params![id, sample.sensor_name, sample.sensor_value_celsius])?;
    }
    Ok(())
}

/// Inserts the job (no id) or replaces it and its owned rows (id set).
///
/// Returns the assigned or confirmed id. Replacing an id that has no row
/// fails with [`DatabaseError::NotFound`] and writes nothing.
pub fn upsert(db: &Database, job: &PrintJob) -> Result<i64, DatabaseError> {
    db.in_transaction(|tx| {
        let id = match job.id {
            None => insert_parent(tx, job)?,
            Some(id) => {
                update_parent(tx, id, job)?;
                delete_children(tx, id)?;
                id
            }
        };
        insert_children(tx, id, job)?;
        Ok(id)
    })
}

/// Deletes a job and its owned rows.
pub fn delete(db: &Database, id: i64) -> Result<(), DatabaseError> {
    db.in_transaction(|tx| {
        delete_children(tx, id)?;
        let removed = tx.execute("DELETE FROM print_jobs WHERE id = ?1", params![id])?;
        if removed == 0 {
            // Rolls the child deletes back.
            return Err(DatabaseError::NotFound { id });
        }
        Ok(())
    })
}

// ─── Reads ──────────────────────────────────────────────────────────────────

/// Loads every job with its owned rows, most recent start first.
pub fn load_all(db: &Database) -> Result<Vec<PrintJob>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM print_jobs ORDER BY print_start DESC, id DESC")?;
        let rows: Vec<PrintJobRow> = stmt
            .query_map([], PrintJobRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare("SELECT * FROM filaments")?;
        let mut filaments: HashMap<i64, FilamentUsage> = stmt
            .query_map([], filament_from_row)?
            .collect::<Result<HashMap<_, _>, _>>()?;

        let mut temperatures: HashMap<i64, Vec<TemperatureSample>> = HashMap::new();
        let mut stmt = conn.prepare("SELECT * FROM temperatures ORDER BY print_job_id, id")?;
        for entry in stmt.query_map([], temperature_from_row)? {
            let (job_id, sample) = entry?;
            temperatures.entry(job_id).or_default().push(sample);
        }

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_entity(
                    filaments.remove(&id),
                    temperatures.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    })
}

/// Finds a single job with its owned rows.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<PrintJob>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM print_jobs WHERE id = ?1",
                params![id],
                PrintJobRow::from_row,
            )
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let filament = conn
            .query_row(
                "SELECT * FROM filaments WHERE print_job_id = ?1",
                params![id],
                filament_from_row,
            )
            .optional()?
            .map(|(_, f)| f);

        let mut stmt =
            conn.prepare("SELECT * FROM temperatures WHERE print_job_id = ?1 ORDER BY id")?;
        let samples = stmt
            .query_map(params![id], temperature_from_row)?
            .map(|r| r.map(|(_, s)| s))
            .collect::<Result<Vec<_>, _>>()?;

        row.into_entity(filament, samples).map(Some)
    })
}

/// Counts committed jobs.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM print_jobs", [], |r| r.get(0))?;
        Ok(count.max(0) as u64)
    })
}
