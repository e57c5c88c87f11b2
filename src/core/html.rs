// src/core/html.rs
//
// Tolerant, allocation-light HTML slicing. Not a DOM: it finds tag blocks by
// name (case-insensitive), balances nested tags of the same name, and reads
// attributes from opening tags. Offsets are byte offsets into the original
// string; lowercasing is ASCII-only so they line up with the lowered copy.

use super::sanitize::{decode_entities, normalize_ws};

/// A matched `<tag …>…</tag>` block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element<'a> {
    /// The opening tag, `<` through `>`.
    pub open: &'a str,
    /// Everything between the opening and the closing tag.
    pub inner: &'a str,
    /// Byte offset of `<` of the opening tag.
    pub start: usize,
    /// Byte offset just past the closing tag's `>`.
    pub end: usize,
}

impl<'a> Element<'a> {
    pub fn attr(&self, name: &str) -> Option<String> {
        attr_value(self.open, name)
    }

    /// Visible text: tags removed, entities decoded, whitespace collapsed.
    pub fn text(&self) -> String {
        inner_text(self.inner)
    }
}

pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

#[inline]
fn is_name_boundary(b: Option<&u8>) -> bool {
    match b {
        None => true,
        Some(c) => c.is_ascii_whitespace() || *c == b'>' || *c == b'/',
    }
}

/// Position of the `>` closing the tag that starts at `lt`, skipping quoted
/// attribute values.
fn tag_end(s: &str, lt: usize) -> Option<usize> {
    let b = s.as_bytes();
    let mut in_s = false;
    let mut in_d = false;
    let mut i = lt + 1;
    while i < b.len() {
        match b[i] {
            b'\'' if !in_d => in_s = !in_s,
            b'"' if !in_s => in_d = !in_d,
            b'>' if !in_s && !in_d => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Next `<tag` (whole name, not a prefix of a longer one) at or after `from`.
fn find_open(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = join!("<", tag);
    let mut pos = from;
    while let Some(rel) = lc.get(pos..)?.find(&pat) {
        let at = pos + rel;
        if is_name_boundary(lc.as_bytes().get(at + pat.len())) {
            return Some(at);
        }
        pos = at + pat.len();
    }
    None
}

/// Next `</tag` at or after `from`.
fn find_close(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = join!("</", tag);
    let mut pos = from;
    while let Some(rel) = lc.get(pos..)?.find(&pat) {
        let at = pos + rel;
        if is_name_boundary(lc.as_bytes().get(at + pat.len())) {
            return Some(at);
        }
        pos = at + pat.len();
    }
    None
}

/// Find the next `<tag>…</tag>` block starting at or after `from`, balancing
/// nested blocks of the same tag. Unclosed blocks yield `None`.
pub fn next_element_ci<'a>(s: &'a str, tag: &str, from: usize) -> Option<Element<'a>> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    next_element_in(s, &lc, &tag, from)
}

fn next_element_in<'a>(s: &'a str, lc: &str, tag: &str, from: usize) -> Option<Element<'a>> {
    let start = find_open(lc, tag, from)?;
    let open_end = tag_end(s, start)? + 1;
    let open = &s[start..open_end];

    if open.ends_with("/>") {
        return Some(Element { open, inner: "", start, end: open_end });
    }

    let mut depth = 1usize;
    let mut pos = open_end;
    loop {
        let close = find_close(lc, tag, pos)?;
        match find_open(lc, tag, pos) {
            Some(o) if o < close => {
                depth += 1;
                pos = tag_end(s, o)? + 1;
            }
            _ => {
                depth -= 1;
                let close_end = tag_end(s, close)? + 1;
                if depth == 0 {
                    return Some(Element {
                        open,
                        inner: &s[open_end..close],
                        start,
                        end: close_end,
                    });
                }
                pos = close_end;
            }
        }
    }
}

/// All top-level `<tag>` blocks in `s`, in document order.
pub fn elements_ci<'a>(s: &'a str, tag: &str) -> Vec<Element<'a>> {
    let lc = to_lower(s);
    let tag = to_lower(tag);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(el) = next_element_in(s, &lc, &tag, pos) {
        pos = el.end;
        out.push(el);
    }
    out
}

/// The element whose `id` attribute equals `id` exactly.
pub fn element_by_id<'a>(s: &'a str, id: &str) -> Option<Element<'a>> {
    let b = s.as_bytes();
    let mut i = 0usize;
    while let Some(rel) = s.get(i..)?.find('<') {
        let lt = i + rel;
        let next = b.get(lt + 1).copied();
        if !matches!(next, Some(c) if c.is_ascii_alphabetic()) {
            i = lt + 1;
            continue;
        }
        let gt = tag_end(s, lt)?;
        let open = &s[lt..=gt];
        if attr_value(open, "id").as_deref() == Some(id) {
            return next_element_ci(s, tag_name(open), lt);
        }
        i = gt + 1;
    }
    None
}

/// Tag name of an opening tag, e.g. `"td"` for `<td class=x>`.
pub fn tag_name(open: &str) -> &str {
    let body = open.trim_start_matches('<');
    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'))
        .unwrap_or(body.len());
    &body[..end]
}

/// Read attribute `name` (case-insensitive) from an opening tag.
/// Handles double, single and unquoted values; the value is entity-decoded.
pub fn attr_value(open: &str, name: &str) -> Option<String> {
    let b = open.as_bytes();
    let n = b.len();
    let mut i = 1 + tag_name(open).len();

    while i < n {
        while i < n && b[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= n || b[i] == b'>' || b[i] == b'/' {
            i += 1;
            continue;
        }

        let name_start = i;
        while i < n && !b[i].is_ascii_whitespace() && !matches!(b[i], b'=' | b'>' | b'/') {
            i += 1;
        }
        let attr_name = &open[name_start..i];

        while i < n && b[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value: Option<&str> = None;
        if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() {
                i += 1;
            }
            match b.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let vstart = i + 1;
                    let vend = open[vstart..].find(q as char).map(|e| vstart + e).unwrap_or(n);
                    value = Some(&open[vstart..vend]);
                    i = vend + 1;
                }
                Some(_) => {
                    let vstart = i;
                    while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' {
                        i += 1;
                    }
                    value = Some(&open[vstart..i]);
                }
                None => {}
            }
        }

        if attr_name.eq_ignore_ascii_case(name) {
            return Some(decode_entities(value.unwrap_or("")));
        }
    }
    None
}

/// Remove every `<…>` run, keeping the text between tags.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Visible text of a fragment: tags stripped first, then entities decoded,
/// then whitespace collapsed and trimmed.
pub fn inner_text(fragment: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(fragment)))
}
