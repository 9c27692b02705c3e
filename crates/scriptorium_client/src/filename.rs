/// Local filename for a server-named artifact.
///
/// The server secures names on its side; the client still must not trust
/// them when persisting: path components are stripped, forbidden
/// characters replaced, and Windows device names patched.
pub fn sanitize_artifact_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned
        .trim_matches(&['_', ' '][..])
        .trim_end_matches('.')
        .to_string();
    if cleaned.is_empty() {
        return "artifact".to_string();
    }

    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    patch_reserved_stem(compacted)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

/// `CON.docx` would still resolve to the CON device on Windows; append an
/// underscore to the stem in that case.
fn patch_reserved_stem(name: String) -> String {
    let (stem, extension) = match name.find('.') {
        Some(idx) => name.split_at(idx),
        None => (name.as_str(), ""),
    };
    if is_reserved_windows_name(stem) {
        format!("{stem}_{extension}")
    } else {
        name
    }
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
