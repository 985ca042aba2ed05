//! Identifier and label derivation from qualified names

/// Identifier-safe graph id: `.` becomes `_`, brackets are dropped.
pub fn graph_id_for(name: &str) -> String {
    name.replace('.', "_").replace(['[', ']'], "")
}

/// Segment after the last `.` with brackets stripped, e.g.
/// `com.example.AppComponent` → `AppComponent`. Used as the output file stem.
pub fn simple_name(path: &str) -> String {
    let tail = path.rsplit('.').next().unwrap_or(path);
    tail.replace(['[', ']'], "")
}

/// Shorten every qualified type in a key to its simple name, at any
/// generic depth: `java.util.Map<java.lang.String, java.util.List<a.B>>`
/// becomes `Map<String, List<B>>`.
pub fn simplify_key(key: &str) -> String {
    let key = key.trim();
    let Some(open) = key.find('<') else {
        return last_segment(key).to_string();
    };
    let close = key.rfind('>').filter(|&close| close > open);
    let inner = &key[open + 1..close.unwrap_or(key.len())];
    let suffix = close.map_or("", |close| &key[close + 1..]);

    let args: Vec<String> = split_arguments(inner).into_iter().map(simplify_key).collect();
    format!("{}<{}>{}", last_segment(&key[..open]), args.join(", "), suffix)
}

/// Split generic arguments on the commas that are not nested in `<..>`.
fn split_arguments(inner: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut begin = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(&inner[begin..i]);
                begin = i + 1;
            }
            _ => {}
        }
    }
    args.push(&inner[begin..]);
    args
}

fn last_segment(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
