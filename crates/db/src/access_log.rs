use rusqlite::{Row, params};
use viewlog_core::{AccessRecord, Device, HourBucket, LogType, TrafficRecord};

use crate::Db;
use crate::error::Result;

fn log_type_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<LogType> {
    let code: i64 = row.get(idx)?;
    LogType::from_code(code).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, code))
}

impl Db {
    /// Replaces every access and traffic row belonging to one hour bucket
    /// in a single transaction: delete by bucket predicate, then bulk
    /// insert. Reprocessing a bucket any number of times yields the same
    /// rows.
    pub fn replace_bucket(
        &mut self,
        bucket: HourBucket,
        access: &[AccessRecord],
        traffic: &[TrafficRecord],
    ) -> Result<(usize, usize)> {
        let key = bucket.format();
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM access_log WHERE substr(accessed_at, 1, 10) = ?1",
            params![key],
        )?;
        tx.execute(
            "DELETE FROM traffic_log WHERE substr(created_at, 1, 10) = ?1",
            params![key],
        )?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO access_log (
                  account_id, video_id, type, title, video_tag, behls_tag,
                  origin_name, size, animation_gif_hash, animation_gif_size,
                  accessed_at, accessed_on, host, ip, protocol, method, port,
                  http_status_code, device, user_agent, referer, created_at
                ) VALUES (
                  ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                  ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22
                )
                "#,
            )?;
            for record in access {
                stmt.execute(params![
                    record.account_id,
                    record.video_id,
                    record.log_type.code(),
                    record.title,
                    record.video_tag,
                    record.behls_tag,
                    record.origin_name,
                    record.size,
                    record.animation_gif_hash,
                    record.animation_gif_size,
                    record.accessed_at,
                    record.accessed_on,
                    record.host,
                    record.ip,
                    record.protocol,
                    record.method,
                    record.port,
                    record.http_status_code,
                    record.device.as_str(),
                    record.user_agent,
                    record.referer,
                    record.created_at,
                ])?;
            }
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO traffic_log (
                  type, animation_gif_id, traffic, ip, user_agent, device, created_at
                ) VALUES (
                  ?1, ?2, ?3, ?4, ?5, ?6, ?7
                )
                "#,
            )?;
            for record in traffic {
                stmt.execute(params![
                    record.log_type.code(),
                    record.animation_gif_id,
                    record.traffic,
                    record.ip,
                    record.user_agent,
                    record.device.as_str(),
                    record.created_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok((access.len(), traffic.len()))
    }

    pub fn access_rows_for_bucket(&self, bucket: HourBucket) -> Result<Vec<AccessRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT account_id, video_id, type, title, video_tag, behls_tag,
                   origin_name, size, animation_gif_hash, animation_gif_size,
                   accessed_at, accessed_on, host, ip, protocol, method, port,
                   http_status_code, device, user_agent, referer, created_at
            FROM access_log
            WHERE substr(accessed_at, 1, 10) = ?1
            ORDER BY accessed_at, id
            "#,
        )?;
        let rows = stmt.query_map([bucket.format()], |row| {
            Ok(AccessRecord {
                account_id: row.get(0)?,
                video_id: row.get(1)?,
                log_type: log_type_from_row(row, 2)?,
                title: row.get(3)?,
                video_tag: row.get(4)?,
                behls_tag: row.get(5)?,
                origin_name: row.get(6)?,
                size: row.get(7)?,
                animation_gif_hash: row.get(8)?,
                animation_gif_size: row.get(9)?,
                accessed_at: row.get(10)?,
                accessed_on: row.get(11)?,
                host: row.get(12)?,
                ip: row.get(13)?,
                protocol: row.get(14)?,
                method: row.get(15)?,
                port: row.get(16)?,
                http_status_code: row.get(17)?,
                device: Device::parse(&row.get::<_, String>(18)?),
                user_agent: row.get(19)?,
                referer: row.get(20)?,
                created_at: row.get(21)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn traffic_rows_for_bucket(&self, bucket: HourBucket) -> Result<Vec<TrafficRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT type, animation_gif_id, traffic, ip, user_agent, device, created_at
            FROM traffic_log
            WHERE substr(created_at, 1, 10) = ?1
            ORDER BY created_at, id
            "#,
        )?;
        let rows = stmt.query_map([bucket.format()], |row| {
            Ok(TrafficRecord {
                log_type: log_type_from_row(row, 0)?,
                animation_gif_id: row.get(1)?,
                traffic: row.get(2)?,
                ip: row.get(3)?,
                user_agent: row.get(4)?,
                device: Device::parse(&row.get::<_, String>(5)?),
                created_at: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
