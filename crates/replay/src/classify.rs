use viewlog_core::LogType;
use viewlog_db::Db;

use crate::cache::CatalogCache;
use crate::types::{ClassifiedHit, RawHit, ResolvedAsset};

const WATCH_PREFIX: &str = "/watch";
const EMBED_PREFIX: &str = "/embed";
const ANIGIF_PREFIX: &str = "/anigif";

/// Decides whether a hit is in scope and extracts its asset tag (the final
/// path segment). Out-of-scope paths yield `None`.
pub fn classify(hit: RawHit) -> Option<ClassifiedHit> {
    if hit.path.is_empty() {
        return None;
    }
    let kind = if hit.path.starts_with(ANIGIF_PREFIX) {
        LogType::Anigif
    } else if hit.path.starts_with(WATCH_PREFIX) || hit.path.starts_with(EMBED_PREFIX) {
        LogType::Video
    } else {
        return None;
    };
    let tag = hit.path.rsplit('/').next().unwrap_or_default().to_string();
    if tag.is_empty() {
        return None;
    }
    Some(ClassifiedHit { hit, kind, tag })
}

/// Resolves a classified hit against the catalog. A lookup miss yields
/// `Ok(None)`: the asset may have been deleted or the tag may be stale, so
/// the hit is dropped rather than treated as an error.
pub fn resolve(
    db: &Db,
    cache: &mut CatalogCache,
    hit: &ClassifiedHit,
) -> viewlog_db::Result<Option<ResolvedAsset>> {
    match hit.kind {
        LogType::Video => Ok(cache
            .video_by_behls_tag(db, &hit.tag)?
            .map(ResolvedAsset::Video)),
        LogType::Anigif => Ok(cache
            .animation_gif_by_hash(db, &hit.tag)?
            .map(|(gif, video)| ResolvedAsset::AnimationGif { gif, video })),
    }
}
