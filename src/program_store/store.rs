//! SQLite-backed program store.
//!
//! Writes go through a single connection behind a mutex, reads are spread
//! round-robin over a small pool of read-only connections. The database runs
//! in WAL mode so readers never wait on the writer.

use super::models::{NewProgram, Program, ProgramPatch};
use super::schema::PROGRAM_VERSIONED_SCHEMAS;
use super::trait_def::ProgramStore;
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const PROGRAM_COLUMNS: &str = "id, title, synopsis, poster, country, year, category_id";

#[derive(Clone)]
pub struct SqliteProgramStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

impl SqliteProgramStore {
    /// Opens (creating it if needed) the programs database at `db_path`.
    ///
    /// A fresh database gets the latest schema; an existing one is migrated and
    /// validated, and rejected if it was written by a newer version.
    /// `read_pool_size` is clamped to at least one connection.
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open programs database {:?}", db_path))?;

        migrate_if_needed(&mut write_conn, PROGRAM_VERSIONED_SCHEMAS)
            .context("Programs database schema check failed")?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let program_count: i64 =
            write_conn.query_row("SELECT COUNT(*) FROM program", [], |r| r.get(0))?;
        info!("Opened programs database with {} programs", program_count);

        let read_pool_size = read_pool_size.max(1);
        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteProgramStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn parse_program_row(row: &rusqlite::Row) -> rusqlite::Result<Program> {
        Ok(Program {
            id: row.get(0)?,
            title: row.get(1)?,
            synopsis: row.get(2)?,
            poster: row.get(3)?,
            country: row.get(4)?,
            year: row.get(5)?,
            category_id: row.get(6)?,
        })
    }
}

impl ProgramStore for SqliteProgramStore {
    fn read_all(&self) -> Result<Vec<Program>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM program ORDER BY id",
            PROGRAM_COLUMNS
        ))?;
        let programs = stmt
            .query_map([], Self::parse_program_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(programs)
    }

    fn read_one(&self, id: i64) -> Result<Option<Program>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let program = conn
            .query_row(
                &format!("SELECT {} FROM program WHERE id = ?1", PROGRAM_COLUMNS),
                params![id],
                Self::parse_program_row,
            )
            .optional()?;
        Ok(program)
    }

    fn create(&self, program: &NewProgram) -> Result<i64> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO program (title, synopsis, poster, country, year, category_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                program.title,
                program.synopsis,
                program.poster,
                program.country,
                program.year,
                program.category_id,
            ],
        )
        .context("Failed to insert program")?;
        let id = conn.last_insert_rowid();
        debug!("Created program {} ({})", id, program.title);
        Ok(id)
    }

    fn update(&self, id: i64, patch: &ProgramPatch) -> Result<bool> {
        let conn = self.write_conn.lock().unwrap();
        let affected = conn
            .execute(
                "UPDATE program SET \
                 title = coalesce(?1, title), \
                 synopsis = coalesce(?2, synopsis), \
                 poster = coalesce(?3, poster), \
                 country = coalesce(?4, country), \
                 year = coalesce(?5, year), \
                 category_id = coalesce(?6, category_id) \
                 WHERE id = ?7",
                params![
                    patch.title.as_coalesce_param(),
                    patch.synopsis.as_coalesce_param(),
                    patch.poster.as_coalesce_param(),
                    patch.country.as_coalesce_param(),
                    patch.year.as_coalesce_param(),
                    patch.category_id.as_coalesce_param(),
                    id,
                ],
            )
            .with_context(|| format!("Failed to update program {}", id))?;
        Ok(affected > 0)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.write_conn.lock().unwrap();
        let affected = conn
            .execute("DELETE FROM program WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete program {}", id))?;
        Ok(affected > 0)
    }

    fn count(&self) -> Result<usize> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM program", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}
