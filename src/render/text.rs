//! Text layout helpers: typography application and word wrapping.
//!
//! Layout is approximate (average glyph width) since real font metrics
//! belong to the renderer. It only has to be stable, not exact.

use crate::design::{TextAlign, TextStyle};

use super::layer::{Rect, TextLine};

/// Average glyph advance as a fraction of font size.
const AVG_GLYPH: f32 = 0.52;

/// Role-independent text parameters for one line.
#[derive(Debug, Clone)]
pub struct LineSpec<'a> {
    pub font_family: &'a str,
    pub base_size: f32,
    pub style: &'a TextStyle,
    pub color: &'a str,
    pub uppercase: bool,
}

impl LineSpec<'_> {
    /// Final font size after the style's scale.
    pub fn font_size(&self) -> f32 {
        self.base_size * self.style.scale
    }

    /// Distance between baselines.
    pub fn advance(&self) -> f32 {
        self.font_size() * self.style.line_height
    }

    /// Approximate characters that fit in `width`.
    pub fn chars_per_line(&self, width: f32) -> usize {
        let glyph = self.font_size() * AVG_GLYPH + self.style.letter_spacing;
        if glyph <= 0.0 {
            return usize::MAX;
        }
        ((width / glyph).floor() as usize).max(1)
    }

    /// Lay out one line with its baseline at `y`, aligned within `region`.
    pub fn line(&self, text: impl Into<String>, y: f32, region: Rect) -> TextLine {
        TextLine {
            text: text.into(),
            x: align_x(self.style.align, region),
            y,
            font_family: self.font_family.to_string(),
            font_size: self.font_size(),
            weight: self.style.weight,
            letter_spacing: self.style.letter_spacing,
            align: self.style.align,
            color: self.color.to_string(),
            uppercase: self.uppercase,
        }
    }

    /// Wrap `text` to `region` and lay out the lines from baseline `y`.
    /// Returns the lines and the baseline after the last one.
    pub fn paragraph(&self, text: &str, y: f32, region: Rect) -> (Vec<TextLine>, f32) {
        let mut baseline = y;
        let mut lines = Vec::new();
        for chunk in wrap(text, self.chars_per_line(region.width)) {
            lines.push(self.line(chunk, baseline, region));
            baseline += self.advance();
        }
        (lines, baseline)
    }
}

/// Anchor x for an alignment inside `region`.
pub fn align_x(align: TextAlign, region: Rect) -> f32 {
    match align {
        TextAlign::Left => region.x,
        TextAlign::Center => region.x + region.width / 2.0,
        TextAlign::Right => region.right(),
    }
}

/// Greedy word wrap to at most `max_chars` per line. Words longer than a
/// line are split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split: String = word.chars().take(max_chars).collect();
                word = word.chars().skip(max_chars).collect();
                lines.push(split);
            }
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_basic() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_paragraphs() {
        assert_eq!(wrap("one\ntwo", 20), vec!["one", "two"]);
        assert!(wrap("", 20).is_empty());
    }

    #[test]
    fn test_align_x() {
        let r = Rect::new(10.0, 0.0, 100.0, 10.0);
        assert_eq!(align_x(TextAlign::Left, r), 10.0);
        assert_eq!(align_x(TextAlign::Center, r), 60.0);
        assert_eq!(align_x(TextAlign::Right, r), 110.0);
    }

    #[test]
    fn test_paragraph_advances_baseline() {
        let style = TextStyle {
            scale: 1.0,
            weight: 400,
            letter_spacing: 0.0,
            line_height: 1.5,
            align: TextAlign::Left,
        };
        let spec = LineSpec {
            font_family: "serif",
            base_size: 10.0,
            style: &style,
            color: "#000",
            uppercase: false,
        };
        let (lines, next) = spec.paragraph("aaa bbb ccc", 100.0, Rect::new(0.0, 0.0, 20.0, 100.0));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].y, 115.0);
        assert_eq!(next, 145.0);
    }
}
