//! Marker-based template compiler.
//!
//! A dynamic sub-tree whose structural shape is identical across items
//! (a flyout submenu) is rendered once into a buffer with marker
//! sequences at each substitution point, then replayed per item with the
//! item's values. Total cost is O(template + n * substitutions) instead
//! of O(n * template).

/// Marker prefix: three code points from a reserved range that literal
/// content never contains. A literal that did contain it would corrupt
/// replay silently, which is why the range is reserved rather than
/// validated at runtime.
pub const MARKER_PREFIX: [char; 3] = ['\u{093a}', '\u{093b}', '\u{0971}'];

/// Code point the marker's index character is offset from.
const MARKER_INDEX_BASE: u32 = 0x0971;

/// Marker sequence for substitution slot `index`. Indices are stable
/// between compile and every replay.
pub fn marker(index: usize) -> String {
    let mut text: String = MARKER_PREFIX.iter().collect();
    match char::from_u32(MARKER_INDEX_BASE + index as u32) {
        Some(c) => text.push(c),
        None => text.push('\u{0971}'),
    }
    text
}

/// Growable character buffer the structural shape is rendered into.
/// Works in char offsets so marker positions are stable regardless of
/// the byte widths of surrounding literals.
#[derive(Debug, Default)]
pub struct TemplateWriter {
    buffer: Vec<char>,
}

impl TemplateWriter {
    pub fn new() -> Self { Self { buffer: Vec::with_capacity(1024) } }

    pub fn write_str(&mut self, text: &str) { self.buffer.extend(text.chars()); }

    pub fn write_char(&mut self, c: char) { self.buffer.push(c); }

    /// Write the marker for substitution slot `index` at the current
    /// position.
    pub fn write_marker(&mut self, index: usize) { self.write_str(&marker(index)); }

    pub fn len(&self) -> usize { self.buffer.len() }

    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

/// A compiled template: the captured shape plus the char offset of every
/// marker, recorded by a single scan.
#[derive(Debug)]
pub struct CompiledTemplate {
    chars: Vec<char>,
    offsets: Vec<usize>,
}

impl CompiledTemplate {
    pub fn compile(writer: TemplateWriter) -> Self {
        let chars = writer.buffer;
        let mut offsets = Vec::with_capacity(32);
        let mut i = 0;
        while i + MARKER_PREFIX.len() < chars.len() {
            if chars[i..i + MARKER_PREFIX.len()] == MARKER_PREFIX {
                offsets.push(i);
                i += MARKER_PREFIX.len() + 1;
            } else {
                i += 1;
            }
        }
        CompiledTemplate { chars, offsets }
    }

    pub fn marker_count(&self) -> usize { self.offsets.len() }

    /// Emit the literal text between markers verbatim, substituting
    /// `parts[index]` at each marker position.
    pub fn replay(&self, parts: &[&str], out: &mut String) {
        let mut pos = 0;
        for &offset in &self.offsets {
            out.extend(&self.chars[pos..offset]);
            let index = (self.chars[offset + MARKER_PREFIX.len()] as u32 - MARKER_INDEX_BASE) as usize;
            if let Some(part) = parts.get(index) {
                out.push_str(part);
            }
            pos = offset + MARKER_PREFIX.len() + 1;
        }
        out.extend(&self.chars[pos..]);
    }

    /// Convenience for single-shot replay.
    pub fn render(&self, parts: &[&str]) -> String {
        let mut out = String::with_capacity(self.chars.len());
        self.replay(parts, &mut out);
        out
    }
}
