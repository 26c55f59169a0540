use std::collections::HashMap;

use viewlog_core::{AnimationGif, Video};
use viewlog_db::Db;

/// Per-run memoization of catalog lookups. Access logs repeat the same hot
/// tags thousands of times per hour; misses are cached too so a stale tag
/// costs one query per run.
#[derive(Default)]
pub struct CatalogCache {
    videos: HashMap<String, Option<Video>>,
    gifs: HashMap<String, Option<(AnimationGif, Video)>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video_by_behls_tag(&mut self, db: &Db, tag: &str) -> viewlog_db::Result<Option<Video>> {
        if let Some(found) = self.videos.get(tag) {
            return Ok(found.clone());
        }
        let found = db.find_video_by_behls_tag(tag)?;
        self.videos.insert(tag.to_string(), found.clone());
        Ok(found)
    }

    pub fn animation_gif_by_hash(
        &mut self,
        db: &Db,
        hash: &str,
    ) -> viewlog_db::Result<Option<(AnimationGif, Video)>> {
        if let Some(found) = self.gifs.get(hash) {
            return Ok(found.clone());
        }
        let found = db.find_animation_gif_by_hash(hash)?;
        self.gifs.insert(hash.to_string(), found.clone());
        Ok(found)
    }
}
