/// Derive an environment-variable style name from a field identifier.
///
/// `serverName`, `ServerName` and `server_name` all become `SERVER_NAME`.
/// Uppercase runs stay together (`databaseURL` is `DATABASE_URL`, `HTTPServer`
/// is `HTTP_SERVER`). Digits belong to the word before them, so `s3Bucket` is
/// `S3_BUCKET`. Leading underscores are dropped, internal underscore runs are
/// kept.
pub fn derive_env_name(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        // digits are transparent when looking for the end of the previous word
        let prev = chars[..i].iter().rev().copied().find(|p| !p.is_ascii_digit());
        let next = chars.get(i + 1).copied();

        // `_X` and `X` after a word both end up as a single `_X`
        if c == '_' && next.is_some_and(|n| n.is_ascii_uppercase()) {
            continue;
        }

        if c.is_ascii_uppercase() {
            let run_starts = matches!(prev, Some(p) if p == '_' || p.is_ascii_lowercase());
            let acronym_ends = prev.is_some_and(|p| p.is_ascii_uppercase())
                && next.is_some_and(|n| n.is_ascii_lowercase());
            if run_starts || acronym_ends {
                out.push('_');
            }
        }
        out.push(c);
    }

    out.trim_start_matches('_').to_uppercase()
}
