use chrono::NaiveDateTime;
use viewlog_core::{AccessRecord, Device, TrafficRecord, compact_date, compact_datetime};

use crate::types::{ClassifiedHit, ResolvedAsset};

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Builds the persisted rows for one resolved hit: an access row always,
/// and a traffic row when the hit is an animated gif.
///
/// The field mapping from log columns to record fields is declared here,
/// statically, in full. `ingested_at` stamps the access row's `created_at`;
/// the traffic row's `created_at` is the hit's own time, an asymmetry
/// carried from the upstream schema.
pub fn build_records(
    hit: &ClassifiedHit,
    asset: &ResolvedAsset,
    device: Device,
    ingested_at: NaiveDateTime,
) -> (AccessRecord, Option<TrafficRecord>) {
    let (video, gif) = match asset {
        ResolvedAsset::Video(video) => (video, None),
        ResolvedAsset::AnimationGif { gif, video } => (video, Some(gif)),
    };
    let raw = &hit.hit;
    let user_agent = raw.user_agent.as_deref().and_then(non_empty);
    let referer = raw.referer.as_deref().and_then(non_empty);

    let access = AccessRecord {
        account_id: video.account_id,
        video_id: video.id,
        log_type: hit.kind,
        title: video.title.clone(),
        video_tag: video.video_tag.clone(),
        behls_tag: video.behls_tag.clone(),
        origin_name: video.origin_name.clone(),
        size: video.size.unwrap_or(0),
        animation_gif_hash: gif.map(|gif| gif.hash.clone()),
        animation_gif_size: gif.and_then(|gif| gif.size),
        accessed_at: compact_datetime(raw.accessed_at),
        accessed_on: compact_date(raw.accessed_at.date()),
        host: non_empty(&raw.host),
        ip: non_empty(&raw.ip),
        protocol: non_empty(&raw.protocol),
        method: non_empty(&raw.method),
        port: non_empty(&raw.port),
        http_status_code: non_empty(&raw.status),
        device,
        user_agent: user_agent.clone(),
        referer,
        created_at: compact_datetime(ingested_at),
    };

    let traffic = gif.map(|gif| TrafficRecord {
        log_type: hit.kind,
        animation_gif_id: gif.id,
        traffic: gif.size.unwrap_or(0),
        ip: non_empty(&raw.ip),
        user_agent,
        device,
        created_at: compact_datetime(raw.accessed_at),
    });

    (access, traffic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use viewlog_core::{AnimationGif, LogType, Video};

    use crate::types::RawHit;

    fn video() -> Video {
        Video {
            id: 1,
            account_id: 7,
            title: "First upload".to_string(),
            video_tag: "vt-1".to_string(),
            behls_tag: "abc123".to_string(),
            origin_name: "first.mp4".to_string(),
            size: Some(12345),
        }
    }

    fn raw_hit() -> RawHit {
        RawHit {
            accessed_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .expect("date")
                .and_hms_opt(10, 15, 0)
                .expect("time"),
            path: "/watch/abc123".to_string(),
            host: "host1".to_string(),
            ip: "1.2.3.4".to_string(),
            protocol: "HTTP/1.1".to_string(),
            method: "GET".to_string(),
            port: "443".to_string(),
            status: "200".to_string(),
            user_agent: Some("Mozilla/5.0".to_string()),
            referer: None,
        }
    }

    fn ingested_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .expect("date")
            .and_hms_opt(16, 0, 30)
            .expect("time")
    }

    #[test]
    fn video_hit_builds_access_row_only() {
        let hit = ClassifiedHit {
            hit: raw_hit(),
            kind: LogType::Video,
            tag: "abc123".to_string(),
        };
        let asset = ResolvedAsset::Video(video());
        let (access, traffic) = build_records(&hit, &asset, Device::Pc, ingested_at());

        assert_eq!(traffic, None);
        assert_eq!(access.account_id, 7);
        assert_eq!(access.video_id, 1);
        assert_eq!(access.log_type, LogType::Video);
        assert_eq!(access.size, 12345);
        assert_eq!(access.animation_gif_hash, None);
        assert_eq!(access.animation_gif_size, None);
        assert_eq!(access.accessed_at, "20240101101500");
        assert_eq!(access.accessed_on, "20240101");
        assert_eq!(access.created_at, "20240101160030");
        assert_eq!(access.device, Device::Pc);
        assert_eq!(access.referer, None);
    }

    #[test]
    fn anigif_hit_builds_both_rows_with_created_at_asymmetry() {
        let mut raw = raw_hit();
        raw.path = "/anigif/deadbeef".to_string();
        let hit = ClassifiedHit {
            hit: raw,
            kind: LogType::Anigif,
            tag: "deadbeef".to_string(),
        };
        let asset = ResolvedAsset::AnimationGif {
            gif: AnimationGif {
                id: 9,
                video_id: 1,
                hash: "deadbeef".to_string(),
                size: Some(2048),
            },
            video: video(),
        };
        let (access, traffic) = build_records(&hit, &asset, Device::Mobile, ingested_at());
        let traffic = traffic.expect("traffic row");

        assert_eq!(access.log_type, LogType::Anigif);
        assert_eq!(access.animation_gif_hash.as_deref(), Some("deadbeef"));
        assert_eq!(access.animation_gif_size, Some(2048));
        // The access row is stamped at ingestion, the traffic row at the hit.
        assert_eq!(access.created_at, "20240101160030");
        assert_eq!(traffic.created_at, "20240101101500");
        assert_eq!(traffic.animation_gif_id, 9);
        assert_eq!(traffic.traffic, 2048);
        assert_eq!(traffic.device, Device::Mobile);
    }

    #[test]
    fn absent_sizes_default_to_zero() {
        let mut no_size = video();
        no_size.size = None;
        let hit = ClassifiedHit {
            hit: raw_hit(),
            kind: LogType::Video,
            tag: "abc123".to_string(),
        };
        let (access, _) = build_records(
            &hit,
            &ResolvedAsset::Video(no_size.clone()),
            Device::Pc,
            ingested_at(),
        );
        assert_eq!(access.size, 0);

        let mut raw = raw_hit();
        raw.path = "/anigif/deadbeef".to_string();
        let hit = ClassifiedHit {
            hit: raw,
            kind: LogType::Anigif,
            tag: "deadbeef".to_string(),
        };
        let asset = ResolvedAsset::AnimationGif {
            gif: AnimationGif {
                id: 9,
                video_id: 1,
                hash: "deadbeef".to_string(),
                size: None,
            },
            video: no_size,
        };
        let (access, traffic) = build_records(&hit, &asset, Device::Pc, ingested_at());
        assert_eq!(traffic.expect("traffic row").traffic, 0);
        assert_eq!(access.animation_gif_size, None);
    }

    #[test]
    fn empty_source_fields_become_null() {
        let mut raw = raw_hit();
        raw.host.clear();
        raw.protocol.clear();
        raw.port.clear();
        raw.status.clear();
        raw.user_agent = Some(String::new());
        let hit = ClassifiedHit {
            hit: raw,
            kind: LogType::Video,
            tag: "abc123".to_string(),
        };
        let (access, _) = build_records(
            &hit,
            &ResolvedAsset::Video(video()),
            Device::Unknown,
            ingested_at(),
        );
        assert_eq!(access.host, None);
        assert_eq!(access.protocol, None);
        assert_eq!(access.port, None);
        assert_eq!(access.http_status_code, None);
        assert_eq!(access.user_agent, None);
        assert_eq!(access.ip.as_deref(), Some("1.2.3.4"));
    }
}
