use crate::config::HighlightMode;
use crate::model::{Family, Gender, Individual};
use indexmap::IndexSet;
use std::collections::HashMap;

pub(crate) fn gender_matches(mode: HighlightMode, gender: Gender) -> bool {
    matches!(
        (mode, gender),
        (HighlightMode::Paternal, Gender::Male) | (HighlightMode::Maternal, Gender::Female)
    )
}

/// Keys of the parent whose lineage the active mode traces. `None` when the
/// family has no such parent or the id does not resolve.
pub(crate) fn parent_keys<'a>(
    family: &Family,
    mode: HighlightMode,
    individuals: &HashMap<&str, &'a Individual>,
) -> Option<&'a IndexSet<String>> {
    let id = match mode {
        HighlightMode::Paternal => family.father_id.as_deref(),
        HighlightMode::Maternal => family.mother_id.as_deref(),
        HighlightMode::None => None,
    }?;
    individuals.get(id).map(|parent| &parent.highlight_keys)
}

/// One inline style per highlight key. Stroke i of n keeps `5*(n-i)` px of
/// dash followed by a `5*i` px gap, so stacked strokes stay visible as
/// alternating segments; the first stroke is solid underneath them all.
pub(crate) fn stroke_styles(keys: &IndexSet<String>) -> Vec<String> {
    let total = keys.len();
    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            let color = if key == "n/a" { "black" } else { key.as_str() };
            if i == 0 {
                format!("stroke:{color}")
            } else {
                format!(
                    "stroke:{color};stroke-dasharray:{},{};stroke-linecap:butt;fill:none",
                    5 * (total - i),
                    5 * i
                )
            }
        })
        .collect()
}
