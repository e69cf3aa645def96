//! SQLite-based storage for profiles, the activity catalog, fixed blocks and
//! generated blocks.

use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::data_dir;
use super::migrations;
use super::traits::{ActivityCatalog, FixedBlockSource, GeneratedBlockSink, ProfileSource};
use crate::error::{CoreError, DatabaseError};
use crate::schedule::{Activity, FixedBlock, GeneratedBlock, Profile};
use crate::timeline::clock;

// === Helper Functions ===

const DATE_FORMAT: &str = "%Y-%m-%d";
const BLOCK_TIME_FORMAT: &str = "%H:%M:%S";

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Read a text column and parse it with `FromStr`.
fn parse_column<T>(row: &rusqlite::Row, idx: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

fn parse_clock_column(row: &rusqlite::Row, idx: usize) -> Result<NaiveTime, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    clock::parse_clock(&raw).map_err(|e| conversion_error(idx, e))
}

fn parse_date_column(row: &rusqlite::Row, idx: usize) -> Result<NaiveDate, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_block_time(time: NaiveTime) -> String {
    time.format(BLOCK_TIME_FORMAT).to_string()
}

fn row_to_profile(row: &rusqlite::Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        user_id: row.get(0)?,
        physical_level: parse_column(row, 1)?,
        availability_intensity: parse_column(row, 2)?,
    })
}

fn row_to_activity(row: &rusqlite::Row) -> Result<Activity, rusqlite::Error> {
    Ok(Activity {
        id: row.get(0)?,
        name: row.get(1)?,
        duration_minutes: row.get(2)?,
        intensity_level: parse_column(row, 3)?,
        required_physical_level: parse_column(row, 4)?,
        category: row.get(5)?,
    })
}

fn row_to_fixed_block(row: &rusqlite::Row) -> Result<FixedBlock, rusqlite::Error> {
    Ok(FixedBlock {
        id: row.get(0)?,
        user_id: row.get(1)?,
        day_of_week: parse_column(row, 2)?,
        start_time: parse_clock_column(row, 3)?,
        end_time: parse_clock_column(row, 4)?,
        label: row.get(5)?,
    })
}

fn row_to_generated_block(row: &rusqlite::Row) -> Result<GeneratedBlock, rusqlite::Error> {
    Ok(GeneratedBlock {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: parse_date_column(row, 2)?,
        start_time: parse_clock_column(row, 3)?,
        end_time: parse_clock_column(row, 4)?,
        activity_id: row.get(5)?,
        status: parse_column(row, 6)?,
    })
}

const FIXED_BLOCK_COLUMNS: &str = "id, user_id, day_of_week, start_time, end_time, label";
const GENERATED_BLOCK_COLUMNS: &str =
    "id, user_id, date, start_time, end_time, activity_id, status";

/// SQLite database for schedule storage.
///
/// Stores profiles, the activity catalog, fixed blocks and generated blocks.
pub struct ScheduleDb {
    conn: Connection,
}

impl ScheduleDb {
    /// Open the schedule database at `~/.config/weekplan/weekplan.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be prepared or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("weekplan.db");
        Ok(Self::open_path(path)?)
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id                TEXT PRIMARY KEY,
                physical_level         TEXT NOT NULL,
                availability_intensity TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activities (
                id                      TEXT PRIMARY KEY,
                name                    TEXT NOT NULL,
                duration_minutes        INTEGER NOT NULL,
                intensity_level         TEXT NOT NULL,
                required_physical_level TEXT NOT NULL,
                category                TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS fixed_blocks (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                day_of_week TEXT NOT NULL,
                start_time  TEXT NOT NULL,
                end_time    TEXT NOT NULL,
                label       TEXT
            );

            CREATE TABLE IF NOT EXISTS generated_blocks (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                date        TEXT NOT NULL,
                start_time  TEXT NOT NULL,
                end_time    TEXT NOT NULL,
                activity_id TEXT NOT NULL,
                status      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_fixed_blocks_user ON fixed_blocks(user_id);
            CREATE INDEX IF NOT EXISTS idx_generated_blocks_user_date
                ON generated_blocks(user_id, date);",
        )?;

        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    // === Profile CRUD ===

    /// Create or overwrite the profile for `profile.user_id`.
    pub fn upsert_profile(&self, profile: &Profile) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO profiles (user_id, physical_level, availability_intensity)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                physical_level = excluded.physical_level,
                availability_intensity = excluded.availability_intensity",
            params![
                profile.user_id,
                profile.physical_level.as_str(),
                profile.availability_intensity.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError> {
        let profile = self
            .conn
            .query_row(
                "SELECT user_id, physical_level, availability_intensity
                 FROM profiles WHERE user_id = ?1",
                params![user_id],
                row_to_profile,
            )
            .optional()?;
        Ok(profile)
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, physical_level, availability_intensity
             FROM profiles ORDER BY user_id",
        )?;
        let profiles = stmt
            .query_map([], row_to_profile)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    // === Activity CRUD ===

    pub fn create_activity(&self, activity: &Activity) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO activities (id, name, duration_minutes, intensity_level, required_physical_level, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                activity.id,
                activity.name,
                activity.duration_minutes,
                activity.intensity_level.as_str(),
                activity.required_physical_level.as_str(),
                activity.category,
            ],
        )?;
        Ok(())
    }

    pub fn get_activity(&self, id: &str) -> Result<Option<Activity>, DatabaseError> {
        let activity = self
            .conn
            .query_row(
                "SELECT id, name, duration_minutes, intensity_level, required_physical_level, category
                 FROM activities WHERE id = ?1",
                params![id],
                row_to_activity,
            )
            .optional()?;
        Ok(activity)
    }

    /// List the catalog ordered by name.
    pub fn list_activities(&self) -> Result<Vec<Activity>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, duration_minutes, intensity_level, required_physical_level, category
             FROM activities ORDER BY name, id",
        )?;
        let activities = stmt
            .query_map([], row_to_activity)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    /// Delete an activity. Returns whether a row was removed.
    pub fn delete_activity(&self, id: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    // === FixedBlock CRUD ===

    pub fn create_fixed_block(&self, block: &FixedBlock) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO fixed_blocks (id, user_id, day_of_week, start_time, end_time, label)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                block.id,
                block.user_id,
                block.day_of_week.as_str(),
                clock::format_clock(block.start_time),
                clock::format_clock(block.end_time),
                block.label,
            ],
        )?;
        Ok(())
    }

    /// List a user's fixed blocks ordered by weekday, then start time.
    pub fn list_fixed_blocks(&self, user_id: &str) -> Result<Vec<FixedBlock>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {FIXED_BLOCK_COLUMNS} FROM fixed_blocks WHERE user_id = ?1 ORDER BY start_time"
        ))?;
        let mut blocks = stmt
            .query_map(params![user_id], row_to_fixed_block)?
            .collect::<Result<Vec<_>, _>>()?;
        blocks.sort_by_key(|b| (b.day_of_week, b.start_time));
        Ok(blocks)
    }

    /// Delete a fixed block. Returns whether a row was removed.
    pub fn delete_fixed_block(&self, id: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM fixed_blocks WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    // === GeneratedBlock storage ===

    fn insert_blocks(conn: &Connection, blocks: &[GeneratedBlock]) -> Result<usize, rusqlite::Error> {
        let mut stmt = conn.prepare(&format!(
            "INSERT INTO generated_blocks ({GENERATED_BLOCK_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))?;
        for block in blocks {
            stmt.execute(params![
                block.id,
                block.user_id,
                format_date(block.date),
                format_block_time(block.start_time),
                format_block_time(block.end_time),
                block.activity_id,
                block.status.as_str(),
            ])?;
        }
        Ok(blocks.len())
    }

    /// Insert generated blocks as one batch.
    pub fn insert_generated_blocks(&self, blocks: &[GeneratedBlock]) -> Result<usize, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let written = Self::insert_blocks(&tx, blocks)?;
        tx.commit()?;
        Ok(written)
    }

    /// Replace the user's blocks dated `from..=to` in a single transaction.
    pub fn replace_generated_blocks(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        blocks: &[GeneratedBlock],
    ) -> Result<usize, DatabaseError> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<usize, rusqlite::Error> = (|| {
            self.conn.execute(
                "DELETE FROM generated_blocks WHERE user_id = ?1 AND date >= ?2 AND date <= ?3",
                params![user_id, format_date(from), format_date(to)],
            )?;
            Self::insert_blocks(&self.conn, blocks)
        })();

        match result {
            Ok(written) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(written)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err.into())
            }
        }
    }

    fn date_range_clause(
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> (String, Vec<String>) {
        let mut clause = "user_id = ?".to_string();
        let mut values = vec![user_id.to_string()];
        if let Some(from) = from {
            clause += " AND date >= ?";
            values.push(format_date(from));
        }
        if let Some(to) = to {
            clause += " AND date <= ?";
            values.push(format_date(to));
        }
        (clause, values)
    }

    /// List a user's generated blocks, optionally bounded by date (inclusive).
    pub fn list_generated_blocks(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<GeneratedBlock>, DatabaseError> {
        let (clause, values) = Self::date_range_clause(user_id, from, to);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GENERATED_BLOCK_COLUMNS} FROM generated_blocks
             WHERE {clause} ORDER BY date, start_time"
        ))?;
        let blocks = stmt
            .query_map(params_from_iter(values.iter()), row_to_generated_block)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks)
    }

    /// Delete a user's generated blocks, optionally bounded by date (inclusive).
    /// Returns how many were removed.
    pub fn delete_generated_blocks(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<usize, DatabaseError> {
        let (clause, values) = Self::date_range_clause(user_id, from, to);
        let removed = self.conn.execute(
            &format!("DELETE FROM generated_blocks WHERE {clause}"),
            params_from_iter(values.iter()),
        )?;
        Ok(removed)
    }
}

impl ProfileSource for ScheduleDb {
    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError> {
        ScheduleDb::get_profile(self, user_id)
    }
}

impl ActivityCatalog for ScheduleDb {
    fn list_activities(&self) -> Result<Vec<Activity>, DatabaseError> {
        ScheduleDb::list_activities(self)
    }
}

impl FixedBlockSource for ScheduleDb {
    fn list_fixed_blocks(&self, user_id: &str) -> Result<Vec<FixedBlock>, DatabaseError> {
        ScheduleDb::list_fixed_blocks(self, user_id)
    }
}

impl GeneratedBlockSink for ScheduleDb {
    fn insert_generated_blocks(&self, blocks: &[GeneratedBlock]) -> Result<usize, DatabaseError> {
        ScheduleDb::insert_generated_blocks(self, blocks)
    }

    fn replace_generated_blocks(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        blocks: &[GeneratedBlock],
    ) -> Result<usize, DatabaseError> {
        ScheduleDb::replace_generated_blocks(self, user_id, from, to, blocks)
    }
}
