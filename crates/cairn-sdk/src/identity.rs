//! Author, committer and tagger lines.

use chrono::{DateTime, TimeZone};

/// Format an identity header value: `Name <email> <unix seconds> <+hhmm>`.
pub fn identity_line<Tz: TimeZone>(name: &str, email: &str, when: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{name} <{email}> {}", when.format("%s %z"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn formats_seconds_and_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let when = tz.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            identity_line("Ada", "ada@example.com", &when),
            "Ada <ada@example.com> 1700000000 +0200"
        );
    }

    #[test]
    fn negative_offset() {
        let tz = FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap();
        let when = tz.timestamp_opt(0, 0).unwrap();
        assert_eq!(identity_line("B", "b@x", &when), "B <b@x> 0 -0530");
    }
}
