/// Derive a URL slug from a post title.
///
/// Lossy and not unique: two titles that differ only in punctuation or case
/// produce the same slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.replace('_', "-").replace('@', "-at-").chars() {
        if ch == '-' || ch.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if !ch.is_alphanumeric() {
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.extend(ch.to_lowercase());
    }

    slug
}
