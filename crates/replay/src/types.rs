use std::io;

use chrono::NaiveDateTime;
use serde::Serialize;
use viewlog_core::{AnimationGif, LogType, Video};

/// One parsed log line. Exists only while its line is being processed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    pub accessed_at: NaiveDateTime,
    pub path: String,
    pub host: String,
    pub ip: String,
    pub protocol: String,
    pub method: String,
    pub port: String,
    pub status: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// A raw hit that matched an in-scope path, plus its extracted asset tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedHit {
    pub hit: RawHit,
    pub kind: LogType,
    pub tag: String,
}

/// Catalog lookup result for a classified hit.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAsset {
    Video(Video),
    AnimationGif { gif: AnimationGif, video: Video },
}

/// What happened to one hour bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOutcome {
    /// The log file was streamed to the end and the bucket's rows were
    /// committed; the watermark may advance past it.
    Processed(HourStats),
    /// The log file could not be opened; the bucket stays pending.
    Missing,
    /// The stream broke partway through; the bucket stays pending.
    Failed,
}

/// Per-bucket line and row counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HourStats {
    pub lines_read: usize,
    pub lines_malformed: usize,
    pub lines_out_of_scope: usize,
    pub lines_unmatched: usize,
    pub access_rows: usize,
    pub traffic_rows: usize,
}

/// Run summary returned by the scheduler.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayStats {
    pub buckets_attempted: usize,
    pub buckets_processed: usize,
    pub buckets_missing: usize,
    pub buckets_failed: usize,
    pub lines_read: usize,
    pub lines_malformed: usize,
    pub lines_out_of_scope: usize,
    pub lines_unmatched: usize,
    pub access_rows: usize,
    pub traffic_rows: usize,
    /// The bucket the watermark was advanced to, if any.
    pub watermark: Option<String>,
}

impl ReplayStats {
    pub(crate) fn absorb(&mut self, hour: HourStats) {
        self.lines_read += hour.lines_read;
        self.lines_malformed += hour.lines_malformed;
        self.lines_out_of_scope += hour.lines_out_of_scope;
        self.lines_unmatched += hour.lines_unmatched;
        self.access_rows += hour.access_rows;
        self.traffic_rows += hour.traffic_rows;
    }
}

/// Errors emitted by the replay engine.
#[derive(Debug)]
pub enum ReplayError {
    Io(io::Error),
    Db(viewlog_db::DbError),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Db(err) => write!(f, "db error: {}", err),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<io::Error> for ReplayError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<viewlog_db::DbError> for ReplayError {
    fn from(err: viewlog_db::DbError) -> Self {
        Self::Db(err)
    }
}

pub type Result<T> = std::result::Result<T, ReplayError>;
