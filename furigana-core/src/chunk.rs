//! Byte-bounded splitting of request text.
//!
//! The furigana service caps the request size in encoded bytes, not
//! characters, so Japanese text hits the ceiling about three times faster
//! than its character count suggests. Splitting prefers sentence boundaries
//! and only falls back to character-level bisection when a single sentence
//! alone is over the limit.

/// Byte ceiling per remote call. The service rejects requests around the
/// 4KB mark; this leaves headroom for the JSON-RPC envelope.
pub const MAX_CHUNK_BYTES: usize = 3000;

/// UTF-8 encoded length of `text`.
pub fn byte_len(text: &str) -> usize {
    text.len()
}

/// Split `text` into pieces of at most `limit` bytes each.
///
/// Concatenating the returned pieces in order reproduces `text` exactly,
/// and every piece of a non-empty input is non-empty.
/// Pieces end on sentence boundaries (`。` `！` `？` or a line break) where
/// possible; a sentence that alone exceeds `limit` is bisected on character
/// positions instead, so multi-byte characters are never cut mid-encoding.
///
/// Boundary exception: a single character whose encoding is larger than
/// `limit` is emitted as-is, since it cannot be reduced further.
pub fn split_text(text: &str, limit: usize) -> Vec<String> {
    if byte_len(text) <= limit {
        return vec![text.to_string()];
    }
    let mut chunks: Vec<String> = Vec::new();
    let mut buf = String::new();
    for unit in sentence_units(text) {
        if byte_len(&buf) + byte_len(unit) <= limit {
            buf.push_str(unit);
            continue;
        }
        if !buf.is_empty() {
            chunks.push(std::mem::take(&mut buf));
        }
        if byte_len(unit) > limit {
            // 一文だけで上限超過 → 文字単位で二分割
            bisect_into(unit, limit, &mut chunks);
        } else {
            buf.push_str(unit);
        }
    }
    if !buf.is_empty() {
        chunks.push(buf);
    }
    chunks
}

/// Cut `text` after each sentence-ending marker, keeping the marker with
/// its sentence. The tail without a marker is its own unit.
fn sentence_units(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        if matches!(ch, '。' | '！' | '？' | '\n') {
            let end = i + ch.len_utf8();
            units.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        units.push(&text[start..]);
    }
    units
}

/// Emit the longest `limit`-fitting prefixes of `unit` until exhausted.
///
/// Halves a candidate character count until the prefix fits, then extends
/// one character at a time, so the chunk is neither over the limit nor
/// needlessly short. Operates on character positions and re-measures in
/// bytes after each step.
fn bisect_into(unit: &str, limit: usize, out: &mut Vec<String>) {
    let mut rest = unit;
    while !rest.is_empty() {
        let total = rest.chars().count();
        let mut take = total;
        while take > 1 && char_prefix_bytes(rest, take) > limit {
            take /= 2;
        }
        while take < total && char_prefix_bytes(rest, take + 1) <= limit {
            take += 1;
        }
        let end = char_prefix_bytes(rest, take);
        out.push(rest[..end].to_string());
        rest = &rest[end..];
    }
}

/// Byte length of the first `n` characters of `s`.
fn char_prefix_bytes(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(b, _)| b).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let t = "漢字の読み方を教えてください。";
        assert_eq!(split_text(t, MAX_CHUNK_BYTES), vec![t.to_string()]);
        assert_eq!(split_text("", 10), vec![String::new()]);
    }

    #[test]
    fn splits_on_sentence_boundaries() {
        // Sentences are 21 and 18 bytes; a 40-byte limit fits two per chunk.
        let t = "今日は晴れだ。明日は雨だ。今日は晴れだ。明日は雨だ。";
        let chunks = split_text(t, 40);
        assert_eq!(chunks.len(), 2);
        for c in &chunks {
            assert!(byte_len(c) <= 40);
            assert!(c.ends_with('。'));
        }
        assert_eq!(chunks.concat(), t);
    }

    #[test]
    fn line_breaks_count_as_boundaries() {
        let t = "一行目の文章です\n二行目の文章です\n三行目の文章です";
        let chunks = split_text(t, 30);
        assert_eq!(chunks.concat(), t);
        assert!(chunks.len() > 1);
        assert!(chunks[0].ends_with('\n'));
    }

    #[test]
    fn oversized_sentence_falls_back_to_bisection() {
        // One sentence, no boundary markers, well over the limit.
        let t = "あ".repeat(100);
        let chunks = split_text(&t, 30);
        assert_eq!(chunks.concat(), t);
        for c in &chunks {
            assert!(byte_len(c) <= 30);
            assert!(!c.is_empty());
        }
        // 30 bytes / 3 bytes per kana = 10 chars per full chunk
        assert_eq!(chunks[0].chars().count(), 10);
    }

    #[test]
    fn bisection_never_splits_a_code_point() {
        // Limit is not a multiple of the 3-byte kana width.
        let t = "かきくけこさしすせそ";
        let chunks = split_text(&t, 4);
        assert_eq!(chunks.concat(), t);
        for c in &chunks {
            assert_eq!(byte_len(c), 3); // one kana each, 4 would split one
        }
    }

    #[test]
    fn irreducible_single_char_exceeds_limit() {
        let chunks = split_text("漢", 1);
        assert_eq!(chunks, vec!["漢".to_string()]);
    }

    #[test]
    fn mixed_sentences_and_oversized_unit() {
        let long = "ア".repeat(20);
        let t = format!("短い文。{}。次の文。", long);
        let chunks = split_text(&t, 24);
        assert_eq!(chunks.concat(), t);
        for c in &chunks {
            assert!(byte_len(c) <= 24);
        }
    }

    proptest! {
        #[test]
        fn split_round_trips(t in ".*", limit in 4usize..64) {
            let chunks = split_text(&t, limit);
            prop_assert_eq!(chunks.concat(), t);
        }

        // limit >= 4 covers the widest UTF-8 encoding, so the bound holds
        // without the irreducible-character exception.
        #[test]
        fn chunks_stay_under_limit(t in ".*", limit in 4usize..64) {
            for c in split_text(&t, limit) {
                prop_assert!(byte_len(&c) <= limit);
            }
        }

        #[test]
        fn small_inputs_stay_whole(t in ".{0,8}", limit in 64usize..128) {
            prop_assume!(byte_len(&t) <= limit);
            prop_assert_eq!(split_text(&t, limit), vec![t]);
        }
    }
}
