/// Source position tracking for diagnostics and source maps.
///
/// The Markdown layer reports positions as byte ranges into the source
/// buffer, one range per source line (skipping structural list indentation),
/// with adjacent ranges merged. Diagnostics and the exported source-map tree
/// carry character ranges instead, so consumers can address positions in the
/// original text without knowing its byte encoding.

/// A run of bytes in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub location: usize,
    pub length: usize,
}

impl ByteRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub fn end(&self) -> usize {
        self.location + self.length
    }
}

/// A run of characters in the source, produced by translating a `ByteRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    pub location: usize,
    pub length: usize,
}

/// An ordered set of byte ranges. Appending a range that starts exactly where
/// the previous one ends extends that range instead of growing the set, so a
/// multi-line block with no skipped indentation collapses to a single range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteRangeSet {
    pub ranges: Vec<ByteRange>,
}

impl ByteRangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_range(range: ByteRange) -> Self {
        let mut set = Self::new();
        set.append(range);
        set
    }

    pub fn append(&mut self, range: ByteRange) {
        if range.length == 0 {
            return;
        }
        if let Some(last) = self.ranges.last_mut() {
            if last.end() == range.location {
                last.length += range.length;
                return;
            }
        }
        self.ranges.push(range);
    }

    /// Append every range of `other`, merging at the seam.
    pub fn extend(&mut self, other: &ByteRangeSet) {
        for range in &other.ranges {
            self.append(*range);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Concatenate the source text covered by this set, in order.
    pub fn map(&self, source: &str) -> String {
        let mut out = String::new();
        for range in &self.ranges {
            let start = range.location.min(source.len());
            let end = range.end().min(source.len());
            out.push_str(&source[start..end]);
        }
        out
    }
}

/// Translate a byte-range set into character ranges by scanning UTF-8
/// boundaries once, in order. Range edges that fall inside a multi-byte
/// sequence are widened to the enclosing character.
pub fn to_character_ranges(set: &ByteRangeSet, source: &str) -> Vec<CharRange> {
    let mut out = Vec::with_capacity(set.ranges.len());

    let mut chars = source.chars();
    let mut byte_pos = 0usize;
    let mut char_pos = 0usize;

    for range in &set.ranges {
        let start_byte = range.location.min(source.len());
        let end_byte = range.end().min(source.len());

        // Advance to the first character at or past the range start.
        while byte_pos < start_byte {
            match chars.next() {
                Some(ch) => {
                    byte_pos += ch.len_utf8();
                    char_pos += 1;
                }
                None => break,
            }
        }
        let start_char = char_pos;

        while byte_pos < end_byte {
            match chars.next() {
                Some(ch) => {
                    byte_pos += ch.len_utf8();
                    char_pos += 1;
                }
                None => break,
            }
        }

        out.push(CharRange {
            location: start_char,
            length: char_pos - start_char,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_ranges_merge() {
        let mut set = ByteRangeSet::new();
        set.append(ByteRange::new(0, 4));
        set.append(ByteRange::new(4, 3));
        assert_eq!(set.ranges, vec![ByteRange::new(0, 7)]);
    }

    #[test]
    fn disjoint_ranges_kept_apart() {
        let mut set = ByteRangeSet::new();
        set.append(ByteRange::new(0, 4));
        set.append(ByteRange::new(8, 2));
        assert_eq!(set.ranges.len(), 2);
    }

    #[test]
    fn map_concatenates_in_order() {
        let source = "alpha\n    beta\n";
        let mut set = ByteRangeSet::new();
        set.append(ByteRange::new(0, 6));
        set.append(ByteRange::new(10, 5));
        assert_eq!(set.map(source), "alpha\nbeta\n");
    }

    #[test]
    fn character_translation_counts_multibyte_once() {
        // "é" is two bytes, one character.
        let source = "é x\n";
        let set = ByteRangeSet::from_range(ByteRange::new(0, source.len()));
        let chars = to_character_ranges(&set, source);
        assert_eq!(chars, vec![CharRange { location: 0, length: 4 }]);
    }
}
