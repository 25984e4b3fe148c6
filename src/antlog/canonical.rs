use crate::error::CanonicalizationError;
use regex::Regex;
use std::sync::OnceLock;

fn quad_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})_antminer_log_(\d{4}-\d{2}-\d{2})_(\d{4}-\d{2}-\d{2})\.tar",
        )
        .expect("quad pattern compiles")
    })
}

fn plain_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"antminer_log_(\d{4}-\d{2}-\d{2})_(\d{4}-\d{2}-\d{2})\.tar")
            .expect("plain pattern compiles")
    })
}

/// Derive the stable cache key for an uploaded archive filename.
///
/// Two naming conventions are recognized:
/// `<quad>_antminer_log_<date>_<date>.tar` keys as `<quad>_<date1>_<date2>.tar`,
/// and `antminer_log_<date>_<date>.tar` keys as `<date1>_<date2>.tar`. The
/// dotted quad is not validated as a real IP address. Anything else is a hard
/// error, never a guessed default key.
pub fn canonical_key(file_name: &str) -> Result<String, CanonicalizationError> {
    if let Some(caps) = quad_pattern().captures(file_name) {
        return Ok(format!("{}_{}_{}.tar", &caps[1], &caps[2], &caps[3]));
    }
    if let Some(caps) = plain_pattern().captures(file_name) {
        return Ok(format!("{}_{}.tar", &caps[1], &caps[2]));
    }
    Err(CanonicalizationError(file_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::canonical_key;

    #[test]
    fn quad_names_keep_the_quad() {
        let got = canonical_key("10.0.0.1_antminer_log_2024-01-01_2024-01-02.tar").expect("key");
        assert_eq!(got, "10.0.0.1_2024-01-01_2024-01-02.tar");
    }

    #[test]
    fn plain_names_key_on_dates_only() {
        let got = canonical_key("antminer_log_2024-01-01_2024-01-02.tar").expect("key");
        assert_eq!(got, "2024-01-01_2024-01-02.tar");
    }

    #[test]
    fn unrecognized_names_fail() {
        assert!(canonical_key("random.tar").is_err());
        assert!(canonical_key("antminer_log_2024-01-01.tar").is_err());
        assert!(canonical_key("").is_err());
    }

    #[test]
    fn quad_takes_precedence_over_the_embedded_plain_match() {
        let got = canonical_key("192.168.1.77_antminer_log_2023-12-30_2023-12-31.tar").expect("key");
        assert_eq!(got, "192.168.1.77_2023-12-30_2023-12-31.tar");
    }
}
