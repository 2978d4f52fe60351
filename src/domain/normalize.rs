/// Reduce a bare host or full URL to a lowercase registrable host string.
///
/// Trims whitespace, lowercases, strips an `http://`/`https://` scheme, drops
/// everything from the first `/`, and strips a leading `www.` label. The steps
/// repeat until nothing changes so the result is always a fixed point
/// (`normalize_domain(normalize_domain(s)) == normalize_domain(s)`).
///
/// Empty or whitespace-only input yields the empty string ("unknown").
pub fn normalize_domain(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let mut host = lower.as_str();

    loop {
        let before = host.len();

        host = host.trim();
        host = host
            .strip_prefix("http://")
            .or_else(|| host.strip_prefix("https://"))
            .unwrap_or(host);
        host = host.split('/').next().unwrap_or(host);
        host = host.strip_prefix("www.").unwrap_or(host);

        if host.len() == before {
            break;
        }
    }

    host.to_string()
}
