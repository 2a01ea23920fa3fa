/// Converts a human-readable label into a URL-safe slug.
///
/// The label is trimmed and lower-cased, each run of internal whitespace
/// becomes a single `-`, and anything outside of `[a-z0-9-]` is dropped.
pub fn to_kebab_case(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut in_whitespace = false;

    for ch in label.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
            continue;
        }

        in_whitespace = false;

        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }

    slug
}
