//! Text encodings and best-effort encoding detection.
//!
//! [`TextEncoding`] wraps an `encoding_rs` encoding and adds what the indexer
//! needs to know about it: how a line feed looks on the wire.

use super::error::EncodingError;
use encoding_rs::{Encoding, BIG5, GBK, UTF_16BE, UTF_16LE, UTF_8};
use std::fmt;

/// Number of leading bytes inspected by [`detect_encoding`].
pub const DETECTION_SAMPLE_LEN: usize = 1024;

/// Encodings offered by the "cycle encoding" key, in order.
fn cycle() -> [&'static Encoding; 5] {
    [UTF_8, GBK, BIG5, UTF_16LE, UTF_16BE]
}

/// How a line feed is represented in a given encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFeed {
    /// Single `0x0A` byte (UTF-8, GBK, Big5 and every other ASCII-compatible encoding).
    Byte,
    /// `0x0A 0x00` at an even offset.
    Utf16Le,
    /// `0x00 0x0A` at an even offset.
    Utf16Be,
}

impl LineFeed {
    /// Width of the line feed code unit in bytes.
    pub fn width(self) -> u64 {
        match self {
            LineFeed::Byte => 1,
            LineFeed::Utf16Le | LineFeed::Utf16Be => 2,
        }
    }

    /// Whether `unit` (exactly `width()` bytes) is a line feed.
    pub fn matches(self, unit: &[u8]) -> bool {
        match self {
            LineFeed::Byte => unit == [0x0A],
            LineFeed::Utf16Le => unit == [0x0A, 0x00],
            LineFeed::Utf16Be => unit == [0x00, 0x0A],
        }
    }
}

/// A text encoding usable for indexing and decoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// UTF-8.
    pub fn utf8() -> Self {
        Self(UTF_8)
    }

    /// GBK (also covers the `gb2312` label).
    pub fn gbk() -> Self {
        Self(GBK)
    }

    /// Big5.
    pub fn big5() -> Self {
        Self(BIG5)
    }

    /// UTF-16 little endian.
    pub fn utf16le() -> Self {
        Self(UTF_16LE)
    }

    /// UTF-16 big endian.
    pub fn utf16be() -> Self {
        Self(UTF_16BE)
    }

    /// Look up an encoding by WHATWG label (case-insensitive, surrounding
    /// whitespace ignored).
    ///
    /// # Errors
    ///
    /// Returns `EncodingError` for labels `encoding_rs` does not know.
    pub fn from_label(label: &str) -> Result<Self, EncodingError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Self)
            .ok_or_else(|| EncodingError::UnknownLabel(label.to_string()))
    }

    /// Canonical name, e.g. `UTF-8`, `GBK`, `UTF-16LE`.
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Line feed representation for this encoding.
    pub fn line_feed(self) -> LineFeed {
        if self.0 == UTF_16LE {
            LineFeed::Utf16Le
        } else if self.0 == UTF_16BE {
            LineFeed::Utf16Be
        } else {
            LineFeed::Byte
        }
    }

    /// Streaming decoder that keeps partial characters between calls.
    pub fn new_decoder(self) -> encoding_rs::Decoder {
        self.0.new_decoder_without_bom_handling()
    }

    /// Decode bytes, replacing malformed sequences with U+FFFD.
    pub fn decode_lossy(self, bytes: &[u8]) -> String {
        let (text, _had_errors) = self.0.decode_without_bom_handling(bytes);
        text.into_owned()
    }

    /// Length of this encoding's byte-order mark at the start of `bytes`, or 0.
    pub fn bom_len(self, bytes: &[u8]) -> usize {
        match Encoding::for_bom(bytes) {
            Some((encoding, len)) if encoding == self.0 => len,
            _ => 0,
        }
    }

    /// Next encoding in the user-facing cycle. Encodings outside the cycle
    /// restart it at UTF-8.
    pub fn next_in_cycle(self) -> Self {
        let cycle = cycle();
        match cycle.iter().position(|e| *e == self.0) {
            Some(i) => Self(cycle[(i + 1) % cycle.len()]),
            None => Self(cycle[0]),
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TextEncoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

/// Why [`detect_encoding`] picked an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionReason {
    /// A byte-order mark was found.
    ByteOrderMark,
    /// The sample is structurally valid UTF-8.
    ValidUtf8,
    /// The GBK double-byte pattern outscored UTF-8 sequences.
    GbkHeuristic,
    /// Nothing matched; the caller's fallback was kept.
    Fallback,
}

/// Result of encoding detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Detected encoding.
    pub encoding: TextEncoding,
    /// How it was detected.
    pub reason: DetectionReason,
}

/// Guess the encoding of a text sample.
///
/// Checks BOMs first (UTF-8, UTF-16BE, UTF-16LE), then whether the sample is
/// structurally valid UTF-8, then whether GBK lead/trail byte pairs outnumber
/// well-formed UTF-8 sequences. Falls back to `fallback`.
///
/// Only the first [`DETECTION_SAMPLE_LEN`] bytes are looked at. This is a
/// best-effort classifier.
pub fn detect_encoding(sample: &[u8], fallback: TextEncoding) -> Detection {
    let sample = &sample[..sample.len().min(DETECTION_SAMPLE_LEN)];

    let bom = if sample.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some(TextEncoding::utf8())
    } else if sample.starts_with(&[0xFE, 0xFF]) {
        Some(TextEncoding::utf16be())
    } else if sample.starts_with(&[0xFF, 0xFE]) {
        Some(TextEncoding::utf16le())
    } else {
        None
    };
    if let Some(encoding) = bom {
        return Detection {
            encoding,
            reason: DetectionReason::ByteOrderMark,
        };
    }

    if is_structurally_utf8(sample) {
        return Detection {
            encoding: TextEncoding::utf8(),
            reason: DetectionReason::ValidUtf8,
        };
    }

    let (gbk_score, utf8_score) = pair_scores(sample);
    if gbk_score > utf8_score {
        return Detection {
            encoding: TextEncoding::gbk(),
            reason: DetectionReason::GbkHeuristic,
        };
    }

    Detection {
        encoding: fallback,
        reason: DetectionReason::Fallback,
    }
}

/// Lead/continuation byte check. A sequence cut off by the end of the
/// sample counts as valid since the sample is a prefix of the file.
fn is_structurally_utf8(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        let width = match bytes[i] {
            b if b & 0x80 == 0x00 => 1,
            b if b & 0xE0 == 0xC0 => 2,
            b if b & 0xF0 == 0xE0 => 3,
            b if b & 0xF8 == 0xF0 => 4,
            _ => return false,
        };
        let end = (i + width).min(bytes.len());
        if !bytes[i + 1..end].iter().all(|b| b & 0xC0 == 0x80) {
            return false;
        }
        i += width;
    }
    true
}

/// Count GBK-looking byte pairs and complete UTF-8 multi-byte sequences.
fn pair_scores(bytes: &[u8]) -> (usize, usize) {
    let is_cont = |b: u8| b & 0xC0 == 0x80;
    let mut gbk = 0;
    let mut utf8 = 0;

    for i in 0..bytes.len().saturating_sub(1) {
        let (b1, b2) = (bytes[i], bytes[i + 1]);

        if (0x81..=0xFE).contains(&b1) && ((0x40..=0x7E).contains(&b2) || (0x80..=0xFE).contains(&b2)) {
            gbk += 1;
        }

        let tail = &bytes[i + 1..];
        let needed = match b1 {
            b if b & 0xE0 == 0xC0 => 1,
            b if b & 0xF0 == 0xE0 => 2,
            b if b & 0xF8 == 0xF0 => 3,
            _ => continue,
        };
        if tail.len() >= needed && tail[..needed].iter().all(|b| is_cont(*b)) {
            utf8 += 1;
        }
    }

    (gbk, utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(TextEncoding::from_label("UTF-8").unwrap(), TextEncoding::utf8());
        assert_eq!(TextEncoding::from_label(" gbk ").unwrap(), TextEncoding::gbk());
        assert_eq!(TextEncoding::from_label("gb2312").unwrap(), TextEncoding::gbk());
    }

    #[test]
    fn from_label_rejects_unknown() {
        let err = TextEncoding::from_label("not-an-encoding").unwrap_err();
        assert_eq!(err, EncodingError::UnknownLabel("not-an-encoding".to_string()));
    }

    #[test]
    fn line_feed_width_follows_encoding() {
        assert_eq!(TextEncoding::utf8().line_feed(), LineFeed::Byte);
        assert_eq!(TextEncoding::gbk().line_feed(), LineFeed::Byte);
        assert_eq!(TextEncoding::utf16le().line_feed(), LineFeed::Utf16Le);
        assert_eq!(TextEncoding::utf16be().line_feed().width(), 2);
    }

    #[test]
    fn cycle_visits_all_offered_encodings_and_wraps() {
        let mut enc = TextEncoding::utf8();
        let mut seen = vec![enc.name()];
        for _ in 0..4 {
            enc = enc.next_in_cycle();
            seen.push(enc.name());
        }
        assert_eq!(seen, vec!["UTF-8", "GBK", "Big5", "UTF-16LE", "UTF-16BE"]);
        assert_eq!(enc.next_in_cycle(), TextEncoding::utf8());
    }

    #[test]
    fn cycle_from_outside_restarts_at_utf8() {
        let shift_jis = TextEncoding::from_label("shift_jis").unwrap();
        assert_eq!(shift_jis.next_in_cycle(), TextEncoding::utf8());
    }

    #[test]
    fn bom_len_only_counts_matching_bom() {
        let bytes = [0xEF, 0xBB, 0xBF, b'a'];
        assert_eq!(TextEncoding::utf8().bom_len(&bytes), 3);
        assert_eq!(TextEncoding::gbk().bom_len(&bytes), 0);
        assert_eq!(TextEncoding::utf16le().bom_len(&[0xFF, 0xFE, b'a', 0]), 2);
    }

    mod detection {
        use super::*;

        #[test]
        fn utf8_bom_detected() {
            let d = detect_encoding(&[0xEF, 0xBB, 0xBF, b'h', b'i'], TextEncoding::gbk());
            assert_eq!(d.encoding, TextEncoding::utf8());
            assert_eq!(d.reason, DetectionReason::ByteOrderMark);
        }

        #[test]
        fn utf16_boms_detected() {
            let be = detect_encoding(&[0xFE, 0xFF, 0x00, b'a'], TextEncoding::utf8());
            assert_eq!(be.encoding, TextEncoding::utf16be());
            let le = detect_encoding(&[0xFF, 0xFE, b'a', 0x00], TextEncoding::utf8());
            assert_eq!(le.encoding, TextEncoding::utf16le());
            assert_eq!(le.reason, DetectionReason::ByteOrderMark);
        }

        #[test]
        fn plain_ascii_is_utf8() {
            let d = detect_encoding(b"hello\nworld\n", TextEncoding::gbk());
            assert_eq!(d.encoding, TextEncoding::utf8());
            assert_eq!(d.reason, DetectionReason::ValidUtf8);
        }

        #[test]
        fn multibyte_utf8_is_utf8() {
            let d = detect_encoding("中文测试\n".as_bytes(), TextEncoding::gbk());
            assert_eq!(d.encoding, TextEncoding::utf8());
        }

        #[test]
        fn utf8_truncated_at_sample_end_still_valid() {
            let text = "中文".as_bytes();
            let d = detect_encoding(&text[..4], TextEncoding::gbk());
            assert_eq!(d.reason, DetectionReason::ValidUtf8);
        }

        #[test]
        fn gbk_text_detected_by_heuristic() {
            let (bytes, _, _) = GBK.encode("这是一个中文文本文件的示例内容");
            let d = detect_encoding(&bytes, TextEncoding::utf8());
            assert_eq!(d.encoding, TextEncoding::gbk());
            assert_eq!(d.reason, DetectionReason::GbkHeuristic);
        }

        #[test]
        fn unrecognized_bytes_fall_back() {
            let d = detect_encoding(&[0xFF, 0x41, 0xFF, 0x42], TextEncoding::big5());
            assert_eq!(d.encoding, TextEncoding::big5());
            assert_eq!(d.reason, DetectionReason::Fallback);
        }

        #[test]
        fn empty_sample_is_utf8() {
            let d = detect_encoding(&[], TextEncoding::gbk());
            assert_eq!(d.encoding, TextEncoding::utf8());
        }
    }
}
