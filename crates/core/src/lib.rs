use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One calendar hour, the unit of idempotent replay.
///
/// The formatted form is `YYYYMMDDHH`; lexicographic order on it coincides
/// with chronological order, which the store relies on when it selects rows
/// by bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourBucket {
    date: NaiveDate,
    hour: u32,
}

impl HourBucket {
    /// Truncates a timestamp to its containing hour.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self {
            date: value.date(),
            hour: value.hour(),
        }
    }

    /// Parses the `YYYYMMDDHH` form.
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() != 10 {
            return None;
        }
        let date = NaiveDate::parse_from_str(value.get(..8)?, "%Y%m%d").ok()?;
        let hour = value.get(8..10)?.parse::<u32>().ok()?;
        if hour >= 24 {
            return None;
        }
        Some(Self { date, hour })
    }

    /// Parses the stored watermark form `YYYYMMDDHH0000`; the trailing
    /// minute and second are always zero and are ignored.
    pub fn parse_setting(value: &str) -> Option<Self> {
        if value.len() != 14 || !value.ends_with("0000") {
            return None;
        }
        Self::parse(value.get(..10)?)
    }

    pub fn format(&self) -> String {
        format!("{}{:02}", self.date.format("%Y%m%d"), self.hour)
    }

    pub fn format_setting(&self) -> String {
        format!("{}0000", self.format())
    }

    /// The next hour. Saturates at the calendar's end.
    pub fn succ(&self) -> Self {
        if self.hour < 23 {
            Self {
                date: self.date,
                hour: self.hour + 1,
            }
        } else {
            Self {
                date: self.date.succ_opt().unwrap_or(self.date),
                hour: 0,
            }
        }
    }

    /// `YYYYMMDD`, the date part of the log file name.
    pub fn date_part(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// `HH`, zero-padded, the hour part of the log file name.
    pub fn hour_part(&self) -> String {
        format!("{:02}", self.hour)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}

impl std::fmt::Display for HourBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

/// `YYYYMMDDHHMMSS`, the timestamp form stored in the log tables.
pub fn compact_datetime(value: NaiveDateTime) -> String {
    value.format("%Y%m%d%H%M%S").to_string()
}

/// `YYYYMMDD`, the date form stored in `accessed_on`.
pub fn compact_date(value: NaiveDate) -> String {
    value.format("%Y%m%d").to_string()
}

/// Coarse device category derived from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Pc,
    Mobile,
    Tablet,
    Crawler,
    Unknown,
}

impl Device {
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Pc => "pc",
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
            Device::Crawler => "crawler",
            Device::Unknown => "unknown",
        }
    }

    /// Inverse of [`Device::as_str`]; unrecognized values map to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "pc" => Device::Pc,
            "mobile" => Device::Mobile,
            "tablet" => Device::Tablet,
            "crawler" => Device::Crawler,
            _ => Device::Unknown,
        }
    }
}

/// Numeric `type` column values carried from the upstream schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Video,
    Anigif,
}

impl LogType {
    pub fn code(self) -> i64 {
        match self {
            LogType::Video => 1,
            LogType::Anigif => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(LogType::Video),
            2 => Some(LogType::Anigif),
            _ => None,
        }
    }
}

/// A catalog video. Reference data, never mutated by the replay engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub account_id: i64,
    pub title: String,
    pub video_tag: String,
    pub behls_tag: String,
    pub origin_name: String,
    pub size: Option<i64>,
}

/// An animated-gif rendition of a video, addressed by content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationGif {
    pub id: i64,
    pub video_id: i64,
    pub hash: String,
    pub size: Option<i64>,
}

/// One normalized access row, keyed logically by the hour bucket of
/// `accessed_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub account_id: i64,
    pub video_id: i64,
    pub log_type: LogType,
    pub title: String,
    pub video_tag: String,
    pub behls_tag: String,
    pub origin_name: String,
    pub size: i64,
    pub animation_gif_hash: Option<String>,
    pub animation_gif_size: Option<i64>,
    /// `YYYYMMDDHHMMSS`, the hit time.
    pub accessed_at: String,
    /// `YYYYMMDD`, the hit date.
    pub accessed_on: String,
    pub host: Option<String>,
    pub ip: Option<String>,
    pub protocol: Option<String>,
    pub method: Option<String>,
    pub port: Option<String>,
    pub http_status_code: Option<String>,
    pub device: Device,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// `YYYYMMDDHHMMSS`, the ingestion time.
    pub created_at: String,
}

/// One network-transfer row, written for animated-gif hits only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub log_type: LogType,
    pub animation_gif_id: i64,
    /// Bytes transferred, the gif's size.
    pub traffic: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub device: Device,
    /// `YYYYMMDDHHMMSS`, the hit time (not the ingestion time).
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(value: &str) -> HourBucket {
        HourBucket::parse(value).expect("bucket")
    }

    #[test]
    fn bucket_parse_format_roundtrip() {
        let bucket = bucket("2024010113");
        assert_eq!(bucket.format(), "2024010113");
        assert_eq!(bucket.format_setting(), "20240101130000");
        assert_eq!(bucket.date_part(), "20240101");
        assert_eq!(bucket.hour_part(), "13");
    }

    #[test]
    fn bucket_parse_rejects_malformed_values() {
        assert!(HourBucket::parse("2024010124").is_none());
        assert!(HourBucket::parse("20240101").is_none());
        assert!(HourBucket::parse("202413011x").is_none());
        assert!(HourBucket::parse_setting("2024010113").is_none());
        assert!(HourBucket::parse_setting("20240101131500").is_none());
    }

    #[test]
    fn bucket_parse_setting_ignores_zero_minutes() {
        assert_eq!(
            HourBucket::parse_setting("20240101130000"),
            Some(bucket("2024010113"))
        );
    }

    #[test]
    fn bucket_order_is_chronological() {
        assert!(bucket("2024010113") < bucket("2024010114"));
        assert!(bucket("2024010123") < bucket("2024010200"));
        assert!(bucket("2023123123") < bucket("2024010100"));
    }

    #[test]
    fn bucket_succ_crosses_day_boundary() {
        assert_eq!(bucket("2024010113").succ(), bucket("2024010114"));
        assert_eq!(bucket("2024010123").succ(), bucket("2024010200"));
        assert_eq!(bucket("2024022823").succ(), bucket("2024022900"));
    }

    #[test]
    fn bucket_from_datetime_truncates_to_hour() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("date")
            .and_hms_opt(10, 15, 42)
            .expect("time");
        assert_eq!(HourBucket::from_datetime(ts), bucket("2024010110"));
    }

    #[test]
    fn compact_forms_match_stored_layout() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("date")
            .and_hms_opt(10, 15, 0)
            .expect("time");
        assert_eq!(compact_datetime(ts), "20240101101500");
        assert_eq!(compact_date(ts.date()), "20240101");
    }

    #[test]
    fn log_type_codes_roundtrip() {
        assert_eq!(LogType::Video.code(), 1);
        assert_eq!(LogType::Anigif.code(), 2);
        assert_eq!(LogType::from_code(1), Some(LogType::Video));
        assert_eq!(LogType::from_code(2), Some(LogType::Anigif));
        assert_eq!(LogType::from_code(3), None);
    }

    #[test]
    fn device_strings_roundtrip() {
        for device in [
            Device::Pc,
            Device::Mobile,
            Device::Tablet,
            Device::Crawler,
            Device::Unknown,
        ] {
            assert_eq!(Device::parse(device.as_str()), device);
        }
        assert_eq!(Device::parse("appliance"), Device::Unknown);
    }
}
