use crate::model::SizeTier;
use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

// Scale factors per size tier, fixed at startup. Tiers outside the tables
// (SizeTier::Other) fall back to 1.0.
static FONT_SCALE: Lazy<BTreeMap<SizeTier, f32>> = Lazy::new(|| {
    BTreeMap::from([
        (SizeTier::T, 0.63),
        (SizeTier::S, 0.8),
        (SizeTier::M, 1.109),
        (SizeTier::L, 1.62),
        (SizeTier::Xl, 2.22),
        (SizeTier::Xxl, 3.2),
        (SizeTier::Xxxl, 4.89),
        (SizeTier::Xxxxl, 9.73),
    ])
});

static STROKE_SCALE: Lazy<BTreeMap<SizeTier, f32>> = Lazy::new(|| {
    BTreeMap::from([
        (SizeTier::T, 0.27),
        (SizeTier::S, 0.7),
        (SizeTier::M, 1.0),
        (SizeTier::L, 1.35),
        (SizeTier::Xl, 1.7),
        (SizeTier::Xxl, 2.0),
        (SizeTier::Xxxl, 2.2),
        (SizeTier::Xxxxl, 2.8),
    ])
});

pub fn font_scale(tier: SizeTier) -> f32 {
    FONT_SCALE.get(&tier).copied().unwrap_or(1.0)
}

pub fn stroke_scale(tier: SizeTier) -> f32 {
    STROKE_SCALE.get(&tier).copied().unwrap_or(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DisplayStyle {
    Nothing,
    Id,
    #[default]
    YearOfBirthAndDeath,
    DateOfBirthAndDeath,
    DateOfBirthAndDeathOnSeparateLines,
    IdAndYearOfBirthAndDeath,
    IdAndDateOfBirthAndDeath,
}

impl DisplayStyle {
    pub fn includes_id(self) -> bool {
        matches!(
            self,
            DisplayStyle::Id
                | DisplayStyle::IdAndYearOfBirthAndDeath
                | DisplayStyle::IdAndDateOfBirthAndDeath
        )
    }

    pub fn shows_dates(self) -> bool {
        !matches!(self, DisplayStyle::Nothing | DisplayStyle::Id)
    }

    pub fn year_only(self) -> bool {
        matches!(
            self,
            DisplayStyle::YearOfBirthAndDeath | DisplayStyle::IdAndYearOfBirthAndDeath
        )
    }

    // These two styles list each date on its own line instead of joining
    // with a dash.
    pub fn separate_lines(self) -> bool {
        matches!(
            self,
            DisplayStyle::DateOfBirthAndDeathOnSeparateLines
                | DisplayStyle::IdAndDateOfBirthAndDeath
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum HighlightMode {
    #[default]
    None,
    Paternal,
    Maternal,
}

impl HighlightMode {
    pub fn is_active(self) -> bool {
        !matches!(self, HighlightMode::None)
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub display_style: DisplayStyle,
    pub highlight_mode: HighlightMode,
    pub monochrome_labels: bool,
    /// Fill colors (lowercase) whose labels are dropped from the output.
    pub unsupported_label_colors: BTreeSet<String>,
    pub font_family: String,
    pub main_font_size: f32,
    pub age_font_size: f32,
    pub line_height: i32,
    /// Locale string prefixed to a death date shown without a birth date.
    pub death_abbrev: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            display_style: DisplayStyle::default(),
            highlight_mode: HighlightMode::default(),
            monochrome_labels: false,
            unsupported_label_colors: BTreeSet::new(),
            font_family: "Arial".to_string(),
            main_font_size: 10.0,
            age_font_size: 9.0,
            line_height: 14,
            death_abbrev: "d.".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn text_padding(&self) -> f32 {
        (self.line_height as f32 - self.main_font_size) / 2.0
    }

    pub fn is_unsupported_color(&self, color: &str) -> bool {
        self.unsupported_label_colors
            .contains(&color.to_ascii_lowercase())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsFile {
    display_style: Option<DisplayStyle>,
    highlight_mode: Option<HighlightMode>,
    monochrome_labels: Option<bool>,
    unsupported_label_colors: Option<Vec<String>>,
    font_family: Option<String>,
    main_font_size: Option<f32>,
    age_font_size: Option<f32>,
    line_height: Option<i32>,
    death_abbrev: Option<String>,
}

pub fn load_options(path: Option<&Path>) -> anyhow::Result<RenderOptions> {
    let options = RenderOptions::default();
    let Some(path) = path else {
        return Ok(options);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    let parsed: OptionsFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(&contents)
            .with_context(|| format!("options file {} is not valid JSON or JSON5", path.display()))?,
    };
    Ok(apply_overlay(options, parsed))
}

fn apply_overlay(mut options: RenderOptions, parsed: OptionsFile) -> RenderOptions {
    if let Some(style) = parsed.display_style {
        options.display_style = style;
    }
    if let Some(mode) = parsed.highlight_mode {
        options.highlight_mode = mode;
    }
    if let Some(monochrome) = parsed.monochrome_labels {
        options.monochrome_labels = monochrome;
    }
    if let Some(colors) = parsed.unsupported_label_colors {
        options.unsupported_label_colors = colors
            .into_iter()
            .map(|color| color.to_ascii_lowercase())
            .collect();
    }
    if let Some(family) = parsed.font_family {
        options.font_family = family;
    }
    if let Some(size) = parsed.main_font_size {
        options.main_font_size = size;
    }
    if let Some(size) = parsed.age_font_size {
        options.age_font_size = size;
    }
    if let Some(height) = parsed.line_height {
        options.line_height = height;
    }
    if let Some(abbrev) = parsed.death_abbrev {
        options.death_abbrev = abbrev;
    }
    options
}
