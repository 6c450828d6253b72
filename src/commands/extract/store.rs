use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};

use crate::model::CleanedRecord;
use crate::util::ensure_parent_directory;

pub const TABLE_NAME: &str = "year_progress";

/// Replaces `path` with a fresh table holding `records`. The table is built
/// in a sibling staging file and renamed into place, so a failed run leaves
/// the previous table untouched.
pub fn write_table(path: &Path, records: &[CleanedRecord]) -> Result<()> {
    ensure_parent_directory(path)?;

    let staging = staging_path(path);
    remove_if_exists(&staging)?;

    if let Err(err) = build_table(&staging, records) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    fs::rename(&staging, path).with_context(|| {
        format!(
            "failed to move {} into place at {}",
            staging.display(),
            path.display()
        )
    })
}

pub fn load_records(path: &Path) -> Result<Vec<CleanedRecord>> {
    let connection =
        Connection::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut statement = connection
        .prepare(&format!(
            "SELECT date, year_perc, replies, retweets, likes FROM {TABLE_NAME} ORDER BY row_index"
        ))
        .with_context(|| format!("failed to query {TABLE_NAME} in {}", path.display()))?;

    let rows = statement.query_map([], |row| {
        Ok((
            row.get::<_, NaiveDate>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, i64>(3)?,
            row.get::<_, i64>(4)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (date, year_perc, replies, retweets, likes) = row?;
        records.push(CleanedRecord {
            date,
            year_perc: u8::try_from(year_perc).context("stored year_perc out of range")?,
            replies: u64::try_from(replies).context("stored replies is negative")?,
            retweets: u64::try_from(retweets).context("stored retweets is negative")?,
            likes: u64::try_from(likes).context("stored likes is negative")?,
        });
    }

    Ok(records)
}

fn build_table(path: &Path, records: &[CleanedRecord]) -> Result<()> {
    let mut connection =
        Connection::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    insert_records(&mut connection, records)?;
    connection
        .close()
        .map_err(|(_, err)| err)
        .with_context(|| format!("failed to close {}", path.display()))
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "DELETE")
        .context("failed to set journal_mode=DELETE")?;
    Ok(())
}

fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(&format!(
            "
            CREATE TABLE {TABLE_NAME} (
              row_index INTEGER PRIMARY KEY,
              date TEXT NOT NULL,
              year_perc INTEGER NOT NULL CHECK (year_perc BETWEEN 0 AND 100),
              replies INTEGER NOT NULL CHECK (replies >= 0),
              retweets INTEGER NOT NULL CHECK (retweets >= 0),
              likes INTEGER NOT NULL CHECK (likes >= 0)
            );
            "
        ))
        .context("failed to create output table")
}

fn insert_records(connection: &mut Connection, records: &[CleanedRecord]) -> Result<()> {
    let tx = connection.transaction()?;
    {
        let mut statement = tx.prepare(&format!(
            "INSERT INTO {TABLE_NAME} (row_index, date, year_perc, replies, retweets, likes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        ))?;

        for (row_index, record) in records.iter().enumerate() {
            statement
                .execute(params![
                    i64::try_from(row_index)?,
                    record.date,
                    i64::from(record.year_perc),
                    sql_count(record.replies, row_index, "replies")?,
                    sql_count(record.retweets, row_index, "retweets")?,
                    sql_count(record.likes, row_index, "likes")?,
                ])
                .with_context(|| format!("failed to insert row {row_index}"))?;
        }
    }
    tx.commit().context("failed to commit output table")?;
    Ok(())
}

fn sql_count(value: u64, row_index: usize, field: &str) -> Result<i64> {
    i64::try_from(value)
        .with_context(|| format!("row {row_index}: {field} value {value} does not fit the table"))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("failed to remove stale {}", path.display()))?;
    }
    Ok(())
}
