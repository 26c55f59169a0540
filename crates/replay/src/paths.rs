use std::path::{Path, PathBuf};

use viewlog_core::HourBucket;

const LOG_FILE_PREFIX: &str = "video-access.log";

/// The rotated log file for one bucket:
/// `<log_dir>/video-access.log.<YYYYMMDD>.<HH>`.
pub fn log_file_path(log_dir: &Path, bucket: HourBucket) -> PathBuf {
    log_dir.join(format!(
        "{}.{}.{}",
        LOG_FILE_PREFIX,
        bucket.date_part(),
        bucket.hour_part()
    ))
}
