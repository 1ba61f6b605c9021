use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static FONT_DB: Lazy<Database> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    db
});

/// Text measurement for one font family. Sizes vary per call because label
/// boxes derive their font size from a per-label scale factor.
///
/// Widths are rounded half-up to whole pixels so that wrapping decisions
/// are stable across providers.
pub trait FontMetrics: Sync {
    fn string_width(&self, text: &str, font_size: f32) -> f32;
    fn ascent(&self, font_size: f32) -> f32;
    fn descent(&self, font_size: f32) -> f32;
}

pub struct SystemFontMetrics {
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    ascii_advances: [u16; 128],
    advance_cache: Mutex<HashMap<char, Option<u16>>>,
}

impl SystemFontMetrics {
    /// Resolve `font_family` (a CSS-style family list) against the system
    /// font database. Returns `None` when no face matches.
    pub fn load(font_family: &str) -> Option<Self> {
        #[derive(Clone, Copy)]
        enum FamilyToken {
            Generic(Family<'static>),
            Name(usize),
        }

        let mut names: Vec<String> = Vec::new();
        let mut order: Vec<FamilyToken> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => order.push(FamilyToken::Generic(Family::Serif)),
                "sans-serif" => order.push(FamilyToken::Generic(Family::SansSerif)),
                "monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                "cursive" => order.push(FamilyToken::Generic(Family::Cursive)),
                "fantasy" => order.push(FamilyToken::Generic(Family::Fantasy)),
                "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    order.push(FamilyToken::Generic(Family::SansSerif))
                }
                "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                _ => {
                    let idx = names.len();
                    names.push(raw.to_string());
                    order.push(FamilyToken::Name(idx));
                }
            }
        }
        if order.is_empty() {
            order.push(FamilyToken::Generic(Family::SansSerif));
        }

        let mut families: Vec<Family<'_>> = Vec::with_capacity(order.len());
        for token in order {
            match token {
                FamilyToken::Generic(family) => families.push(family),
                FamilyToken::Name(idx) => families.push(Family::Name(names[idx].as_str())),
            }
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = FONT_DB.query(&query)?;
        let mut loaded: Option<SystemFontMetrics> = None;
        FONT_DB.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                let units_per_em = face.units_per_em().max(1) as f32;
                let mut ascii_advances = [0u16; 128];
                for byte in 0u8..=127 {
                    if let Some(glyph_id) = face.glyph_index(byte as char) {
                        ascii_advances[byte as usize] =
                            face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    }
                }
                loaded = Some(SystemFontMetrics {
                    data: data.to_vec(),
                    index,
                    units_per_em,
                    ascender: face.ascender() as f32,
                    descender: face.descender() as f32,
                    ascii_advances,
                    advance_cache: Mutex::new(HashMap::new()),
                });
            }
        });
        if let Some(metrics) = &loaded {
            log::debug!(
                "resolved font family {:?} ({} units/em)",
                font_family,
                metrics.units_per_em
            );
        }
        loaded
    }

    // Non-ASCII advances are looked up lazily; each unique char parses the
    // face once and is cached after that.
    fn char_advance(&self, ch: char) -> Option<u16> {
        let mut cache = match self.advance_cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(cached) = cache.get(&ch) {
            return *cached;
        }
        let advance = Face::parse(&self.data, self.index)
            .ok()
            .and_then(|face| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
            });
        cache.insert(ch, advance);
        advance
    }
}

impl FontMetrics for SystemFontMetrics {
    fn string_width(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() || font_size <= 0.0 {
            return 0.0;
        }
        let scale = font_size / self.units_per_em;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;

        if text.is_ascii() {
            for byte in text.as_bytes() {
                match *byte {
                    b'\n' => {}
                    b'\t' => width += self.ascii_advances[b' ' as usize] as f32 * scale * 4.0,
                    byte => {
                        let advance = self.ascii_advances[byte as usize];
                        if advance == 0 {
                            width += fallback;
                        } else {
                            width += advance as f32 * scale;
                        }
                    }
                }
            }
            return width.max(0.0).round();
        }

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            match self.char_advance(ch) {
                Some(advance) => width += advance as f32 * scale,
                None => width += fallback,
            }
        }
        width.max(0.0).round()
    }

    fn ascent(&self, font_size: f32) -> f32 {
        self.ascender * font_size / self.units_per_em
    }

    fn descent(&self, font_size: f32) -> f32 {
        -self.descender * font_size / self.units_per_em
    }
}

/// Deterministic metrics backed by a precomputed width table, for
/// environments without usable system fonts and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTableMetrics;

impl CharTableMetrics {
    pub fn new() -> Self {
        CharTableMetrics
    }
}

impl FontMetrics for CharTableMetrics {
    fn string_width(&self, text: &str, font_size: f32) -> f32 {
        if font_size <= 0.0 {
            return 0.0;
        }
        let width: f32 = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(char_width_factor)
            .sum();
        (width * font_size).round()
    }

    fn ascent(&self, font_size: f32) -> f32 {
        0.905 * font_size
    }

    fn descent(&self, font_size: f32) -> f32 {
        0.212 * font_size
    }
}

// Advance widths from Arial at 2048 units per em, divided down to factors
// of the font size. Unmapped chars use the lowercase average.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' | '!' | '.' | ',' | ':' | ';' | '/' | '\\' | 'I' | 'f' | 't' => 0.278,
        '\t' => 1.112,
        'i' | 'j' | 'l' | '\'' => 0.222,
        '(' | ')' | '[' | ']' | '{' | '}' | 'r' => 0.333,
        '"' => 0.355,
        '|' => 0.26,
        '-' => 0.333,
        '–' => 0.556,
        '?' | '0'..='9' | '$' | '#' | '_' => 0.556,
        '*' => 0.389,
        '+' | '=' | '<' | '>' | '~' => 0.584,
        '%' => 0.889,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 0.667,
        '@' => 1.015,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 0.722,
        'F' | 'T' | 'Z' => 0.611,
        'G' | 'O' | 'Q' => 0.778,
        'J' => 0.5,
        'L' => 0.556,
        'M' | 'm' => 0.833,
        'W' => 0.944,
        'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 0.556,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.5,
        _ => 0.55,
    }
}
