/// Minimal multipart/form-data reader for the two upload forms.

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct Part<'a> {
    pub name: Option<String>,
    pub filename: Option<String>,
    pub data: &'a [u8],
}

impl Part<'_> {
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// Splits a multipart body into its parts. Preamble, epilogue and parts
/// without a header block are skipped.
pub fn parse_parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";

    split_on(body, delimiter.as_bytes())
        .into_iter()
        .filter_map(|raw| {
            let sep_pos = find_subsequence(raw, sep)?;
            let headers = String::from_utf8_lossy(&raw[..sep_pos]);
            let data = &raw[sep_pos + sep.len()..];
            let data = data.strip_suffix(b"\r\n").unwrap_or(data);
            Some(Part {
                name: disposition_param(&headers, "name"),
                filename: disposition_param(&headers, "filename"),
                data,
            })
        })
        .collect()
}

/// Finds the file part uploaded under `field_name`.
pub fn file_part<'p, 'a>(parts: &'p [Part<'a>], field_name: &str) -> Option<&'p Part<'a>> {
    parts.iter().find(|p| p.is_file() && p.name.as_deref() == Some(field_name))
}

/// Reads `key="value"` out of a Content-Disposition header block. The match
/// is anchored on a preceding `;` or space so `name` does not hit `filename`.
fn disposition_param(headers: &str, key: &str) -> Option<String> {
    let needle = format!("{}=\"", key);
    let mut search_from = 0;
    while let Some(rel) = headers[search_from..].find(&needle) {
        let pos = search_from + rel;
        let anchored = pos == 0 || matches!(headers.as_bytes()[pos - 1], b';' | b' ' | b'\t');
        if anchored {
            let rest = &headers[pos + needle.len()..];
            let end = rest.find('"')?;
            return Some(rest[..end].to_owned());
        }
        search_from = pos + needle.len();
    }
    None
}
