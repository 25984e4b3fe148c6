use crate::antlog::bundle::DeviceLines;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// Syslog-style stamps occupy a fixed-width prefix: `"Feb 22 05:55:04"`.
const STAMP_WIDTH: usize = 15;

/// The stamp carries no year, so comparisons happen within a fixed dummy one.
const STAMP_YEAR: &str = "2000";

fn parse_line_stamp(line: &str) -> Option<NaiveDateTime> {
    let prefix = line.get(..STAMP_WIDTH)?;
    let mut parts = prefix.split_whitespace();
    let month = parts.next()?;
    let day = parts.next()?;
    let time = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDateTime::parse_from_str(
        &format!("{STAMP_YEAR} {month} {day} {time}"),
        "%Y %b %d %H:%M:%S",
    )
    .ok()
}

fn compare_lines(a: &str, b: &str) -> Ordering {
    match (parse_line_stamp(a), parse_line_stamp(b)) {
        (Some(stamp_a), Some(stamp_b)) => stamp_a.cmp(&stamp_b),
        _ => a.cmp(b),
    }
}

/// Order each device's connection lines chronologically. Lines whose stamp
/// does not parse fall back to raw string comparison for that pair; the sort
/// is stable, so equal lines keep their discovery order. Power lines keep
/// file-discovery order and never go through here.
pub fn sort_connection_lines(lines: &mut DeviceLines) {
    for device_lines in lines.values_mut() {
        device_lines.sort_by(|a, b| compare_lines(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_lines, parse_line_stamp, sort_connection_lines};
    use crate::antlog::bundle::DeviceLines;
    use std::cmp::Ordering;

    #[test]
    fn parses_padded_and_unpadded_days() {
        assert!(parse_line_stamp("Feb 22 05:55:04 miner pool up").is_some());
        assert!(parse_line_stamp("Jan  2 05:00:00 miner pool up").is_some());
    }

    #[test]
    fn rejects_garbage_prefixes() {
        assert!(parse_line_stamp("not a timestamp here").is_none());
        assert!(parse_line_stamp("short").is_none());
    }

    #[test]
    fn earlier_stamp_sorts_first() {
        let mut lines = DeviceLines::new();
        lines.insert(
            "miner-1".to_string(),
            vec![
                "Jan  2 05:00:00 stratum+tcp late".to_string(),
                "Jan  2 04:00:00 stratum+tcp early".to_string(),
            ],
        );

        sort_connection_lines(&mut lines);

        let got = &lines["miner-1"];
        assert!(got[0].contains("04:00:00"));
        assert!(got[1].contains("05:00:00"));
    }

    #[test]
    fn unparseable_pairs_fall_back_to_string_order() {
        assert_eq!(compare_lines("bbb no stamp", "aaa no stamp"), Ordering::Greater);
        // One parseable side is not enough; the pair still compares as text.
        assert_eq!(
            compare_lines("Jan  2 04:00:00 x", "Aaa garbage line"),
            Ordering::Greater
        );
    }

    #[test]
    fn month_boundary_orders_by_calendar_not_text() {
        let mut lines = DeviceLines::new();
        lines.insert(
            "miner-1".to_string(),
            vec![
                "Feb  1 00:00:01 stratum+tcp b".to_string(),
                "Jan 31 23:59:59 stratum+tcp a".to_string(),
            ],
        );

        sort_connection_lines(&mut lines);

        let got = &lines["miner-1"];
        assert!(got[0].starts_with("Jan 31"));
    }
}
