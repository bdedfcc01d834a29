/// Byte order mark left on the first line of files saved by some editors.
const BOM: char = '\u{feff}';

/// Protocol prefixes removed during normalization. Matched after lower-casing.
const PROTOCOL_PREFIXES: [&str; 2] = ["https://", "http://"];

/// Coarse canonical form of one pasted line.
///
/// Trims whitespace and byte order marks, lower-cases, drops a leading
/// `http://`/`https://` and at most one trailing `/`. Paths, ports, query
/// strings and repeated slashes pass through untouched. An empty result means
/// the line is rejected.
pub fn normalize_domain(input: &str) -> String {
    let lowered = input
        .trim_matches(|c: char| c.is_whitespace() || c == BOM)
        .to_lowercase();

    let mut domain = lowered.as_str();
    for prefix in PROTOCOL_PREFIXES {
        if let Some(rest) = domain.strip_prefix(prefix) {
            domain = rest;
            break;
        }
    }

    domain.strip_suffix('/').unwrap_or(domain).to_string()
}

/// Normalizes a line, returning `None` for lines that normalize to nothing.
pub fn normalize_line(input: &str) -> Option<String> {
    let domain = normalize_domain(input);
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}
