use rusqlite::{Row, params};
use viewlog_core::{AnimationGif, Video};

use crate::Db;
use crate::error::Result;

fn video_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Video> {
    Ok(Video {
        id: row.get(offset)?,
        account_id: row.get(offset + 1)?,
        title: row.get(offset + 2)?,
        video_tag: row.get(offset + 3)?,
        behls_tag: row.get(offset + 4)?,
        origin_name: row.get(offset + 5)?,
        size: row.get(offset + 6)?,
    })
}

impl Db {
    /// Seeds a catalog video with an explicit id. Reference data is owned
    /// by the catalog service; this exists for seeding and tests.
    pub fn insert_video(&self, video: &Video) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO video (id, account_id, title, video_tag, behls_tag, origin_name, size)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                video.id,
                video.account_id,
                video.title,
                video.video_tag,
                video.behls_tag,
                video.origin_name,
                video.size,
            ],
        )?;
        Ok(())
    }

    pub fn insert_animation_gif(&self, gif: &AnimationGif) -> Result<()> {
        self.conn.execute(
            "INSERT INTO animation_gif (id, video_id, hash, size) VALUES (?1, ?2, ?3, ?4)",
            params![gif.id, gif.video_id, gif.hash, gif.size],
        )?;
        Ok(())
    }

    pub fn find_video_by_behls_tag(&self, tag: &str) -> Result<Option<Video>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, account_id, title, video_tag, behls_tag, origin_name, size
            FROM video
            WHERE behls_tag = ?1
            "#,
        )?;
        let mut rows = stmt.query([tag])?;
        if let Some(row) = rows.next()? {
            Ok(Some(video_from_row(row, 0)?))
        } else {
            Ok(None)
        }
    }

    /// Looks up an animated gif by content hash, joined with its parent
    /// video for attribution.
    pub fn find_animation_gif_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<(AnimationGif, Video)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT g.id, g.video_id, g.hash, g.size,
                   v.id, v.account_id, v.title, v.video_tag, v.behls_tag, v.origin_name, v.size
            FROM animation_gif g
            INNER JOIN video v ON v.id = g.video_id
            WHERE g.hash = ?1
            "#,
        )?;
        let mut rows = stmt.query([hash])?;
        if let Some(row) = rows.next()? {
            let gif = AnimationGif {
                id: row.get(0)?,
                video_id: row.get(1)?,
                hash: row.get(2)?,
                size: row.get(3)?,
            };
            let video = video_from_row(row, 4)?;
            Ok(Some((gif, video)))
        } else {
            Ok(None)
        }
    }
}
