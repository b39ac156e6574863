//! Text measurement and word wrapping using `ttf-parser`.
//!
//! Layout math runs in millimetres while font sizes stay in points, matching
//! the page geometry. When a real TTF face is supplied we measure glyph
//! advances; otherwise an average-width heuristic stands in, which is close
//! enough for Helvetica-class faces at quotation font sizes.

/// Points → millimetres.
pub const MM_PER_PT: f32 = 0.352_778;

/// Measures text width for the builtin Helvetica faces the renderer uses.
pub struct TextMeasurer {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API); empty when
    /// running on heuristics.
    face_bytes: Vec<u8>,
    units_per_em: f32,
}

impl TextMeasurer {
    /// Heuristic-only measurer.
    pub fn new() -> Self {
        Self {
            face_bytes: Vec::new(),
            units_per_em: 1000.0,
        }
    }

    /// Measurer backed by a real TTF/OTF face for accurate advances.
    pub fn with_face(bytes: Vec<u8>) -> Result<Self, String> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| format!("Failed to parse font: {e}"))?;
        let units_per_em = face.units_per_em() as f32;
        Ok(Self {
            face_bytes: bytes,
            units_per_em,
        })
    }

    /// Width of `text` in millimetres at `size_pt`.
    pub fn text_width_mm(&self, text: &str, size_pt: f32, bold: bool) -> f32 {
        if self.face_bytes.is_empty() {
            // Average char width ≈ 0.5 × size for proportional faces, bold
            // runs ~10% wider.
            let avg = if bold { 0.55 } else { 0.5 };
            return text.chars().count() as f32 * size_pt * avg * MM_PER_PT;
        }

        if let Ok(face) = ttf_parser::Face::parse(&self.face_bytes, 0) {
            let scale = size_pt / self.units_per_em;
            let mut width_pt = 0.0f32;
            for ch in text.chars() {
                match face.glyph_index(ch) {
                    Some(gid) => {
                        width_pt += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
                    }
                    None => width_pt += size_pt * 0.5,
                }
            }
            width_pt * MM_PER_PT
        } else {
            text.chars().count() as f32 * size_pt * 0.5 * MM_PER_PT
        }
    }

    /// Word-wrap `text` to fit within `max_width_mm`. Existing newlines are
    /// respected; a word wider than the column gets a line of its own.
    pub fn wrap_to_width(
        &self,
        text: &str,
        size_pt: f32,
        bold: bool,
        max_width_mm: f32,
    ) -> Vec<String> {
        if max_width_mm <= 0.0 || text.is_empty() {
            return vec![text.to_string()];
        }

        let mut lines: Vec<String> = Vec::new();
        for paragraph in text.split('\n') {
            let words: Vec<&str> = paragraph.split_whitespace().collect();
            if words.is_empty() {
                lines.push(String::new());
                continue;
            }

            let mut current = String::new();
            for word in &words {
                let candidate = if current.is_empty() {
                    (*word).to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.text_width_mm(&candidate, size_pt, bold) > max_width_mm
                    && !current.is_empty()
                {
                    lines.push(current);
                    current = (*word).to_string();
                } else {
                    current = candidate;
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_width() {
        let m = TextMeasurer::new();
        let w = m.text_width_mm("Hello", 12.0, false);
        // 5 chars × 12 pt × 0.5 × mm-per-pt
        assert!((w - 5.0 * 12.0 * 0.5 * MM_PER_PT).abs() < 0.01);
    }

    #[test]
    fn bold_runs_wider() {
        let m = TextMeasurer::new();
        assert!(m.text_width_mm("abc", 12.0, true) > m.text_width_mm("abc", 12.0, false));
    }

    #[test]
    fn wrap_splits_long_text() {
        let m = TextMeasurer::new();
        let lines = m.wrap_to_width("alpha beta gamma delta epsilon", 12.0, false, 20.0);
        assert!(lines.len() >= 2, "expected wrapping, got {lines:?}");
        for line in &lines {
            if line.split_whitespace().count() > 1 {
                assert!(m.text_width_mm(line, 12.0, false) <= 20.0);
            }
        }
    }

    #[test]
    fn wrap_respects_newlines() {
        let m = TextMeasurer::new();
        let lines = m.wrap_to_width("one\ntwo", 12.0, false, 100.0);
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn wrap_empty_returns_single_line() {
        let m = TextMeasurer::new();
        assert_eq!(m.wrap_to_width("", 12.0, false, 50.0), vec![String::new()]);
    }
}
