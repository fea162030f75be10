//! Bitmap font metrics
//!
//! Reads the AngelCode BMFont text format far enough to measure strings.
//! Glyph pages are the renderer's business.

use std::collections::HashMap;

use crate::error::AssetError;

/// Fallback advance, as a fraction of the font size, for glyphs the font lacks
const FALLBACK_ADVANCE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct BitmapFont {
    pub face: String,
    /// Size the advances were authored at
    pub size: f32,
    pub line_height: f32,
    advances: HashMap<char, f32>,
}

impl BitmapFont {
    pub fn parse(id: &str, text: &str) -> Result<Self, AssetError> {
        let mut face = String::new();
        let mut size = None;
        let mut line_height = None;
        let mut advances = HashMap::new();

        for line in text.lines() {
            let tokens = tokenize(line);
            let Some((tag, rest)) = tokens.split_first() else {
                continue;
            };
            let attrs: HashMap<&str, &str> = rest.iter().filter_map(|p| p.split_once('=')).collect();

            match *tag {
                "info" => {
                    if let Some(f) = attrs.get("face") {
                        face = f.trim_matches('"').to_string();
                    }
                    size = attrs.get("size").and_then(|s| s.parse::<f32>().ok()).map(f32::abs);
                }
                "common" => {
                    line_height = attrs.get("lineHeight").and_then(|s| s.parse::<f32>().ok());
                }
                "char" => {
                    let id = attrs.get("id").and_then(|s| s.parse::<u32>().ok());
                    let advance = attrs.get("xadvance").and_then(|s| s.parse::<f32>().ok());
                    if let (Some(c), Some(advance)) = (id.and_then(char::from_u32), advance) {
                        advances.insert(c, advance);
                    }
                }
                _ => {}
            }
        }

        let size = size.filter(|s| *s > 0.0).ok_or_else(|| AssetError::Parse {
            id: id.to_string(),
            reason: "missing `info size`".to_string(),
        })?;

        Ok(Self {
            face,
            size,
            line_height: line_height.unwrap_or(size),
            advances,
        })
    }

    /// Width of `text` rendered at `size`
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let scale = size / self.size;
        text.chars()
            .map(|c| {
                self.advances
                    .get(&c)
                    .copied()
                    .unwrap_or(self.size * FALLBACK_ADVANCE)
            })
            .sum::<f32>()
            * scale
    }
}

/// Split a line on whitespace, keeping quoted values together
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        if c == '"' {
            quoted = !quoted;
        }
        if c.is_whitespace() && !quoted {
            if let Some(s) = start.take() {
                tokens.push(&line[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&line[s..]);
    }
    tokens
}

/// Width estimate used before any font is available
pub fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * FALLBACK_ADVANCE
}

/// Measure with `font` when loaded, otherwise estimate
pub fn measure(font: Option<&BitmapFont>, text: &str, size: f32) -> f32 {
    match font {
        Some(font) => font.measure(text, size),
        None => estimate_width(text, size),
    }
}
