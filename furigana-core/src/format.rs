//! Rendering of annotated words into the output styles.

use crate::model::{Subword, Word};

/// How an annotation result is rendered to text. Orthogonal to chunking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStyle {
    /// `surface（furigana）` inline notation. The default.
    Brackets,
    /// HTML `<ruby>` markup.
    Ruby,
    /// One line per word with furigana and romanization.
    Detail,
}

impl OutputStyle {
    /// Parse the tool-facing selector. Unknown or absent values fall back
    /// to the bracket style.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("ruby") => OutputStyle::Ruby,
            Some("detail") => OutputStyle::Detail,
            _ => OutputStyle::Brackets,
        }
    }

    /// Separator between formatted chunks when the input was split.
    /// Detail output is line-oriented, so chunks get their own lines; the
    /// inline styles join seamlessly because a chunk seam is not a word
    /// boundary worth preserving.
    pub fn chunk_separator(self) -> &'static str {
        match self {
            OutputStyle::Detail => "\n",
            _ => "",
        }
    }
}

/// Render one annotation result in the given style.
pub fn format_words(words: &[Word], style: OutputStyle) -> String {
    match style {
        OutputStyle::Brackets => inline(words, &bracket_pair),
        OutputStyle::Ruby => inline(words, &ruby_pair),
        OutputStyle::Detail => detail(words),
    }
}

fn bracket_pair(surface: &str, furigana: &str) -> String {
    format!("{}（{}）", surface, furigana)
}

fn ruby_pair(surface: &str, furigana: &str) -> String {
    format!("<ruby>{}<rt>{}</rt></ruby>", surface, furigana)
}

/// Shared shape of the two inline styles: annotated spans get markup,
/// everything else passes through, no separators anywhere.
fn inline(words: &[Word], pair: &dyn Fn(&str, &str) -> String) -> String {
    let mut out = String::new();
    for w in words {
        if let Some(f) = w.distinct_furigana() {
            out.push_str(&pair(&w.surface, f));
        } else if let Some(subs) = &w.subword {
            for s in subs {
                match s.distinct_furigana() {
                    Some(f) => out.push_str(&pair(&s.surface, f)),
                    None => out.push_str(&s.surface),
                }
            }
        } else {
            out.push_str(&w.surface);
        }
    }
    out
}

fn detail(words: &[Word]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for w in words {
        if let Some(subs) = &w.subword {
            lines.push(format!("{}:", w.surface));
            for s in subs {
                lines.push(format!("  {}", reading_line(&s.surface, &s.furigana, &s.roman)));
            }
        } else if w.furigana.is_some() || w.roman.is_some() {
            lines.push(reading_line(&w.surface, &w.furigana, &w.roman));
        } else {
            lines.push(w.surface.clone());
        }
    }
    lines.join("\n")
}

fn reading_line(surface: &str, furigana: &Option<String>, roman: &Option<String>) -> String {
    format!(
        "{}: {} ({})",
        surface,
        furigana.as_deref().unwrap_or(""),
        roman.as_deref().unwrap_or("")
    )
}
