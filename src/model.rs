use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

// Document coordinates grow upward; top_left.y >= bottom_right.y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryRect {
    pub top_left: Position,
    pub bottom_right: Position,
}

impl BoundaryRect {
    pub fn width(&self) -> i32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> i32 {
        self.top_left.y - self.bottom_right.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<BoundaryRect> for Rect {
    fn from(bounds: BoundaryRect) -> Self {
        Rect {
            x: bounds.top_left.x,
            y: bounds.top_left.y,
            width: bounds.width(),
            height: bounds.height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub middle: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub last2: Option<String>,
}

impl Name {
    /// Present parts joined by single spaces, the secondary last name in
    /// parentheses. Empty when no part is set.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for part in [&self.first, &self.middle, &self.last] {
            if let Some(value) = part {
                if !value.is_empty() {
                    parts.push(value.clone());
                }
            }
        }
        if let Some(last2) = &self.last2 {
            if !last2.is_empty() {
                parts.push(format!("({last2})"));
            }
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenoDate {
    pub year: i32,
    #[serde(default)]
    pub month: Option<u8>,
    #[serde(default)]
    pub day: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Birth {
    #[serde(default)]
    pub date: Option<GenoDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Death {
    #[serde(default)]
    pub date: Option<GenoDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: String,
    #[serde(default)]
    pub name: Option<Name>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub birth: Option<Birth>,
    #[serde(default)]
    pub death: Option<Death>,
    pub position: Position,
    pub boundary_rect: BoundaryRect,
    #[serde(default)]
    pub hyperlink: Option<Hyperlink>,
    /// Ordered ancestry color keys; the sentinel "n/a" renders black.
    #[serde(default)]
    pub highlight_keys: IndexSet<String>,
    #[serde(default)]
    pub is_anonymized: bool,
    #[serde(default)]
    pub is_deceased: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PedigreeLinkType {
    Parent,
    Adopted,
    Biological,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PedigreeLink {
    pub individual_id: String,
    pub link_type: PedigreeLinkType,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub twin_position: Option<Position>,
}

impl PedigreeLink {
    pub fn is_parent(&self) -> bool {
        self.link_type == PedigreeLinkType::Parent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FamilyLineType {
    #[default]
    Unspecified,
    NoMoreChildren,
    PossiblyMoreChildren,
    ToBeCompleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: String,
    pub position: Position,
    #[serde(default)]
    pub top_boundary_rect: Option<BoundaryRect>,
    #[serde(default)]
    pub bottom_boundary_rect: Option<BoundaryRect>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub line_type: FamilyLineType,
    #[serde(default)]
    pub pedigree_links: Vec<PedigreeLink>,
    #[serde(default)]
    pub father_id: Option<String>,
    #[serde(default)]
    pub mother_id: Option<String>,
}

impl Family {
    /// A family counts as having children when any non-parent link exists;
    /// anonymization strips child links, so this can be false while a
    /// bottom boundary rect is still present.
    pub fn has_children(&self) -> bool {
        self.pedigree_links.iter().any(|link| !link.is_parent())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeTier {
    T,
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
    Xxxxl,
    // Unknown tier strings land here and render with neutral scale.
    #[serde(other)]
    Other,
}

impl Default for SizeTier {
    fn default() -> Self {
        SizeTier::M
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub color: String,
    #[serde(default)]
    pub size: SizeTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub fill_color: String,
    pub border: Border,
    #[serde(default)]
    pub padding: i32,
    #[serde(default)]
    pub horizontal_alignment: HAlign,
    #[serde(default)]
    pub vertical_alignment: VAlign,
    #[serde(default)]
    pub size: SizeTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub rect: Rect,
    pub style: LabelStyle,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenoMap {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub boundary_rect: BoundaryRect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenoMapData {
    pub geno_map: GenoMap,
    #[serde(default)]
    pub individuals: Vec<Individual>,
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenoDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub maps: Vec<GenoMapData>,
}

impl GenoDocument {
    /// Maps that get materialized as assets; untitled maps are internal
    /// scratch sheets and stay unexported.
    pub fn titled_maps(&self) -> impl Iterator<Item = &GenoMapData> {
        self.maps.iter().filter(|data| {
            data.geno_map
                .title
                .as_deref()
                .is_some_and(|title| !title.is_empty())
        })
    }
}
