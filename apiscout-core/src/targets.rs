use url::Url;

/// Reduces a user-supplied host entry to a bare origin (`host` or `host:port`).
///
/// Accepts entries with or without a scheme and drops any path, query or
/// fragment. Returns `None` for blank or unparseable entries.
pub fn clean_origin(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }

    let with_scheme = if entry.contains("://") {
        entry.to_string()
    } else {
        format!("http://{}", entry)
    };

    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?;
    // `Url::port` hides a port equal to the scheme default, so read it from the entry
    Some(match explicit_port(entry) {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Port written in the entry's authority, if any.
fn explicit_port(entry: &str) -> Option<u16> {
    let rest = entry.split_once("://").map_or(entry, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let (_, port) = host_port.rsplit_once(':')?;
    port.parse().ok()
}

/// The list of usable lines in a newline-delimited target file: trimmed,
/// with blank lines and `#` comments removed.
pub fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Estimated wall-clock minutes for a scan, ignoring response time.
pub fn estimated_minutes(targets: usize, delay_secs: f64, workers: usize) -> f64 {
    if workers == 0 {
        return 0.0;
    }
    targets as f64 * delay_secs / workers as f64 / 60.0
}
