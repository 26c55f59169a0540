use rusqlite::params;
use viewlog_core::HourBucket;

use crate::Db;
use crate::error::{DbError, Result};

/// Reserved settings key holding the replay watermark. Distinct from all
/// user-facing configuration entries.
pub const WATERMARK_KEY: &str = "_sys_last_access_log_created_dt";

impl Db {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_setting (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// The last hour bucket fully processed, if any run has committed one.
    pub fn watermark(&self) -> Result<Option<HourBucket>> {
        let Some(value) = self.get_setting(WATERMARK_KEY)? else {
            return Ok(None);
        };
        let bucket =
            HourBucket::parse_setting(&value).ok_or(DbError::InvalidWatermark(value))?;
        Ok(Some(bucket))
    }

    pub fn set_watermark(&self, bucket: HourBucket) -> Result<()> {
        self.set_setting(WATERMARK_KEY, &bucket.format_setting())
    }
}
