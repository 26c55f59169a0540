use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};
use viewlog_core::HourBucket;
use viewlog_db::Db;

use crate::cache::CatalogCache;
use crate::device::DeviceResolver;
use crate::hour::process_hour;
use crate::types::{BucketOutcome, ReplayStats, Result};

/// Replays every pending hour bucket up to (but excluding) the hour of
/// `now`, then advances the watermark to the last bucket actually
/// processed.
///
/// Without a watermark the cursor starts at the current hour, so the first
/// run processes nothing and no historical backlog is backfilled. A bucket
/// whose file is missing or whose stream fails stays pending and bounds
/// the watermark; buckets after it are still attempted, so one run commits
/// credit for whatever it did manage.
pub fn run_replay(db: &mut Db, log_dir: &Path, now: NaiveDateTime) -> Result<ReplayStats> {
    let now_bucket = HourBucket::from_datetime(now);
    let mut cursor = match db.watermark()? {
        Some(watermark) => watermark.succ(),
        None => now_bucket,
    };
    debug!(cursor = %cursor, now = %now_bucket, "replay window");

    let devices = DeviceResolver::new();
    let mut cache = CatalogCache::new();
    let mut stats = ReplayStats::default();
    let mut last_processed = None;

    while cursor < now_bucket {
        stats.buckets_attempted += 1;
        match process_hour(db, log_dir, cursor, &devices, &mut cache, now)? {
            BucketOutcome::Processed(hour) => {
                stats.buckets_processed += 1;
                stats.absorb(hour);
                last_processed = Some(cursor);
            }
            BucketOutcome::Missing => stats.buckets_missing += 1,
            BucketOutcome::Failed => stats.buckets_failed += 1,
        }
        cursor = cursor.succ();
    }

    if let Some(bucket) = last_processed {
        // A failed watermark write fails the whole run.
        db.set_watermark(bucket)?;
        stats.watermark = Some(bucket.format());
        info!(
            watermark = %bucket,
            processed = stats.buckets_processed,
            missing = stats.buckets_missing,
            failed = stats.buckets_failed,
            access_rows = stats.access_rows,
            traffic_rows = stats.traffic_rows,
            "replay finished"
        );
    } else {
        info!(
            attempted = stats.buckets_attempted,
            "replay finished, no buckets processed, watermark unchanged"
        );
    }
    Ok(stats)
}
