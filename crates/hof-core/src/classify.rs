//! Decides whether text is an image reference and how message bodies split
//! into display-sized chunks.

use url::Url;

/// Recognized image suffixes. Case-sensitive, matched against the end of the
/// reference as-is.
pub const IMAGE_SUFFIXES: [&str; 5] = [".png", ".gif", ".jpg", ".jpeg", ".webm"];

/// True iff `text` ends with one of the recognized image suffixes.
pub fn has_image_extension(text: &str) -> bool {
    IMAGE_SUFFIXES.iter().any(|suffix| text.ends_with(suffix))
}

/// True iff `text` is a well-formed URL ending with a recognized image
/// suffix. Malformed URLs are simply not image references.
pub fn is_image_reference(text: &str) -> bool {
    Url::parse(text).is_ok() && has_image_extension(text)
}

/// Split `body` on newlines and pack consecutive lines into chunks whose
/// length stays strictly under `capacity`.
///
/// Packing is sequential: lines only ever join the most recently started
/// chunk, earlier chunks are never revisited. A single line that alone
/// reaches `capacity` is hard-split at character boundaries so the length
/// bound holds for every chunk.
pub fn chunk(body: &str, capacity: usize) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in body.split('\n') {
        match current.as_mut() {
            Some(cur) if cur.len() + 1 + line.len() < capacity => {
                cur.push('\n');
                cur.push_str(line);
            }
            _ => {
                if let Some(done) = current.take() {
                    chunks.push(done);
                }
                current = Some(start_chunk(line, capacity, &mut chunks));
            }
        }
    }

    if let Some(last) = current {
        chunks.push(last);
    }

    chunks
}

/// Begin a new chunk from `line`, spilling hard-split pieces of an
/// oversized line into `chunks` and returning the still-open remainder.
fn start_chunk(line: &str, capacity: usize, chunks: &mut Vec<String>) -> String {
    let target = capacity.saturating_sub(1).max(1);
    let mut rest = line;

    while rest.len() >= capacity {
        let mut end = target.min(rest.len());
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            // First char is wider than the target; take it whole.
            end = rest
                .char_indices()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
        }
        chunks.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    rest.to_string()
}
