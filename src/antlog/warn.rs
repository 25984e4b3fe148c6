#[derive(Debug, Clone, Copy)]
pub struct WarnEvent<'a> {
    pub code: &'a str,
    pub stage: &'a str,
    pub action: &'a str,
    pub user: &'a str,
    pub archive: &'a str,
    pub reason: &'a str,
    pub err: &'a str,
}

impl<'a> WarnEvent<'a> {
    fn fields(&self) -> [(&'static str, &'a str); 7] {
        [
            ("code", self.code),
            ("stage", self.stage),
            ("action", self.action),
            ("user", self.user),
            ("archive", self.archive),
            ("reason", self.reason),
            ("err", self.err),
        ]
    }
}

/// Collapse a field value to one printable token: whitespace runs become a
/// single `_`, non-printable characters are dropped, blank values print `na`.
fn printable_token(value: &str) -> String {
    let cleaned = value
        .split_whitespace()
        .map(|chunk| {
            chunk
                .chars()
                .filter(|ch| ch.is_ascii_graphic())
                .collect::<String>()
        })
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if cleaned.is_empty() {
        "na".to_string()
    } else {
        cleaned
    }
}

pub fn emit(event: WarnEvent<'_>) {
    let mut line = String::from("ANTLOG_WARN");
    for (key, value) in event.fields() {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&printable_token(value));
    }
    eprintln!("{line}");
}
