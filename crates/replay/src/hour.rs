use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, trace, warn};
use viewlog_core::HourBucket;
use viewlog_db::Db;

use crate::builder::build_records;
use crate::cache::CatalogCache;
use crate::classify::{classify, resolve};
use crate::device::DeviceResolver;
use crate::parser::parse_line;
use crate::paths::log_file_path;
use crate::types::{BucketOutcome, HourStats, Result};

/// Replays one hour bucket from its log file into the store.
///
/// A missing file or a broken stream leaves the bucket pending; the next
/// run will retry it from scratch. A fully consumed file (qualifying rows
/// or not) commits with [`Db::replace_bucket`] and reports `Processed`.
pub fn process_hour(
    db: &mut Db,
    log_dir: &Path,
    bucket: HourBucket,
    devices: &DeviceResolver,
    cache: &mut CatalogCache,
    ingested_at: NaiveDateTime,
) -> Result<BucketOutcome> {
    let path = log_file_path(log_dir, bucket);
    trace!(bucket = %bucket, path = %path.display(), "replaying bucket");

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            warn!(
                bucket = %bucket,
                path = %path.display(),
                error = %err,
                "log file not found, bucket left pending"
            );
            return Ok(BucketOutcome::Missing);
        }
    };

    let mut stats = HourStats::default();
    let mut access_rows = Vec::new();
    let mut traffic_rows = Vec::new();
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    loop {
        buf.clear();
        match reader.read_line(&mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = buf.trim_end_matches(&['\n', '\r'][..]);
                if line.is_empty() {
                    continue;
                }
                stats.lines_read += 1;
                let Some(raw) = parse_line(line) else {
                    stats.lines_malformed += 1;
                    trace!(bucket = %bucket, line, "skipping malformed line");
                    continue;
                };
                let Some(hit) = classify(raw) else {
                    stats.lines_out_of_scope += 1;
                    continue;
                };
                let Some(asset) = resolve(db, cache, &hit)? else {
                    stats.lines_unmatched += 1;
                    trace!(bucket = %bucket, tag = %hit.tag, "no catalog match, dropping hit");
                    continue;
                };
                let device = devices.resolve(hit.hit.user_agent.as_deref());
                let (access, traffic) = build_records(&hit, &asset, device, ingested_at);
                access_rows.push(access);
                if let Some(traffic) = traffic {
                    traffic_rows.push(traffic);
                }
            }
            Err(err) => {
                warn!(
                    bucket = %bucket,
                    path = %path.display(),
                    error = %err,
                    "read failed mid-stream, bucket left pending"
                );
                return Ok(BucketOutcome::Failed);
            }
        }
    }

    let (access_count, traffic_count) = db.replace_bucket(bucket, &access_rows, &traffic_rows)?;
    stats.access_rows = access_count;
    stats.traffic_rows = traffic_count;
    debug!(
        bucket = %bucket,
        lines = stats.lines_read,
        access_rows = access_count,
        traffic_rows = traffic_count,
        "bucket committed"
    );
    Ok(BucketOutcome::Processed(stats))
}
