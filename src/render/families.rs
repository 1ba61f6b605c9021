use super::highlight;
use super::xml::{escape_xml, fmt_num, write_path};
use super::{SvgRenderer, Viewport};
use crate::config::HighlightMode;
use crate::model::{Family, FamilyLineType, Individual, PedigreeLinkType, Rect};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::io::{self, Write};

/// Effective rects for one family's lines, resolved once per family. The
/// bottom boundary only counts while the family still has child links;
/// anonymization can leave a rect with nothing to connect to, and child
/// pedigree links then fall back to the top rect.
enum FamilyLineState {
    None,
    TopOnly { top: Rect },
    BottomOnly { bottom: Rect },
    TopAndBottom { top: Rect, bottom: Rect },
}

impl FamilyLineState {
    fn resolve(family: &Family) -> Self {
        let top = family.top_boundary_rect.map(Rect::from);
        let bottom = family
            .bottom_boundary_rect
            .filter(|_| family.has_children())
            .map(Rect::from);
        match (top, bottom) {
            (None, None) => FamilyLineState::None,
            (Some(top), None) => FamilyLineState::TopOnly { top },
            (None, Some(bottom)) => FamilyLineState::BottomOnly { bottom },
            (Some(top), Some(bottom)) => FamilyLineState::TopAndBottom { top, bottom },
        }
    }

    fn top(&self) -> Option<Rect> {
        match self {
            FamilyLineState::TopOnly { top } | FamilyLineState::TopAndBottom { top, .. } => {
                Some(*top)
            }
            _ => None,
        }
    }

    fn bottom(&self) -> Option<Rect> {
        match self {
            FamilyLineState::BottomOnly { bottom }
            | FamilyLineState::TopAndBottom { bottom, .. } => Some(*bottom),
            _ => None,
        }
    }
}

pub(crate) fn render_family(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    individuals: &HashMap<&str, &Individual>,
    family: &Family,
) -> io::Result<()> {
    let state = FamilyLineState::resolve(family);
    let mode = r.options.highlight_mode;

    // The traced parent's keys, resolved once; a dangling parent id
    // degrades the family to unhighlighted rendering.
    let parent_keys = if mode.is_active() && family.has_children() {
        let keys = highlight::parent_keys(family, mode, individuals);
        if keys.is_none() {
            log::warn!(
                "family {}: cannot resolve the traced parent, drawing unhighlighted",
                family.id
            );
        }
        keys
    } else {
        None
    };

    if let Some(top) = state.top() {
        render_top_line(out, r, vp, family, top, parent_keys)?;
        if let Some(label) = family.label.as_deref() {
            render_family_label(out, r, vp, top, label)?;
        }
        render_line_type_glyph(out, vp, family, top)?;
    }

    if let Some(bottom) = state.bottom() {
        render_bottom_lines(out, r, vp, family, bottom, parent_keys)?;
    }

    for link in &family.pedigree_links {
        render_pedigree_link(out, r, vp, individuals, family, link, &state)?;
    }

    Ok(())
}

fn render_top_line(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    family: &Family,
    top: Rect,
    parent_keys: Option<&IndexSet<String>>,
) -> io::Result<()> {
    let y = vp.y(top.y);
    let left = vp.x(top.x);
    let full_span = format!("M{left} {y}h{}", top.width);
    let mode = r.options.highlight_mode;

    if !mode.is_active() {
        return write_path(out, &full_span, &format!("family-line {}", family.id), None);
    }

    let unhighlighted = format!("family-line unhighlighted {}", family.id);
    if !family.has_children() {
        return write_path(out, &full_span, &unhighlighted, None);
    }
    let Some(keys) = parent_keys else {
        return write_path(out, &full_span, &unhighlighted, None);
    };

    let highlighted = format!("family-line highlighted {}", family.id);
    if family.bottom_boundary_rect.is_some() {
        // Split at the family position: the left half belongs to the
        // father, the right half to the mother.
        let split = vp.x(family.position.x);
        let right = vp.x(top.x + top.width);
        let father_half = format!("M{left} {y}H{split}");
        let mother_half = format!("M{split} {y}H{right}");
        let (lit, dim) = if mode == HighlightMode::Paternal {
            (&father_half, &mother_half)
        } else {
            (&mother_half, &father_half)
        };
        for style in highlight::stroke_styles(keys) {
            write_path(out, lit, &highlighted, Some(&style))?;
        }
        write_path(out, dim, &unhighlighted, None)?;
    } else {
        for style in highlight::stroke_styles(keys) {
            write_path(out, &full_span, &highlighted, Some(&style))?;
        }
    }
    Ok(())
}

fn render_family_label(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    top: Rect,
    label: &str,
) -> io::Result<()> {
    let y = vp.y(top.y) as f32;
    let line_height = r.options.line_height;
    let label_width = r.metrics.string_width(label, r.options.main_font_size) as i32;
    let center_x = vp.x(top.x) as f32 + top.width as f32 / 2.0;

    writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{label_width}" height="{line_height}" class="family-label"/>"#,
        fmt_num(center_x - label_width as f32 / 2.0),
        fmt_num(y - 1.3 * line_height as f32),
    )?;
    writeln!(
        out,
        r#"<text x="{}" y="{}" class="family-label">{}</text>"#,
        fmt_num(center_x),
        fmt_num(y - 0.3 * line_height as f32 - r.options.text_padding()),
        escape_xml(label)
    )
}

fn render_line_type_glyph(
    out: &mut dyn Write,
    vp: &Viewport,
    family: &Family,
    top: Rect,
) -> io::Result<()> {
    let y = vp.y(top.y);
    let top_right = vp.x(top.x + top.width) as f32;

    let (d, class) = match family.line_type {
        FamilyLineType::Unspecified => return Ok(()),
        FamilyLineType::NoMoreChildren => (
            format!("M{} {}h5v5h-5z", fmt_num(top_right - 6.5), y + 3),
            "family-line-no-more-children",
        ),
        FamilyLineType::PossiblyMoreChildren => (
            format!("M{} {}h8m-4 -4v8", fmt_num(top_right - 11.0), y + 6),
            "family-line-possibly-more-children",
        ),
        FamilyLineType::ToBeCompleted => (
            format!("M{} {}l6 6m-6 0l6-6", fmt_num(top_right - 8.5), y + 3),
            "family-line-to-be-completed",
        ),
    };
    write_path(out, &d, class, None)
}

fn render_bottom_lines(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    family: &Family,
    bottom: Rect,
    parent_keys: Option<&IndexSet<String>>,
) -> io::Result<()> {
    let position = family.position;
    let vertical = format!(
        "M{} {}v{}",
        vp.x(position.x),
        vp.y(position.y),
        position.y - bottom.y
    );
    let horizontal = format!("M{} {}h{}", vp.x(bottom.x), vp.y(bottom.y), bottom.width);

    if r.options.highlight_mode.is_active() {
        if let Some(keys) = parent_keys {
            let class = format!("family-line highlighted {}", family.id);
            for style in highlight::stroke_styles(keys) {
                write_path(out, &vertical, &class, Some(&style))?;
                write_path(out, &horizontal, &class, Some(&style))?;
            }
        } else {
            let class = format!("family-line unhighlighted {}", family.id);
            write_path(out, &vertical, &class, None)?;
            write_path(out, &horizontal, &class, None)?;
        }
    } else {
        let class = format!("family-line {}", family.id);
        write_path(out, &vertical, &class, None)?;
        write_path(out, &horizontal, &class, None)?;
    }
    Ok(())
}

fn render_pedigree_link(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    individuals: &HashMap<&str, &Individual>,
    family: &Family,
    link: &crate::model::PedigreeLink,
    state: &FamilyLineState,
) -> io::Result<()> {
    let Some(position) = link.position else {
        log::debug!(
            "family {}: pedigree link to {} has no position, skipping",
            family.id,
            link.individual_id
        );
        return Ok(());
    };

    let mut d = format!("M{} {}", vp.x(position.x), vp.y(position.y));
    if link.is_parent() {
        let Some(top) = state.top() else {
            return Ok(());
        };
        d.push_str(&format!("v{}", position.y - top.y));
    } else if let Some(rect) = state.bottom().or(state.top()) {
        match link.twin_position {
            Some(twin) => d.push_str(&format!("L{} {}", vp.x(twin.x), vp.y(rect.y))),
            None => d.push_str(&format!("v{}", position.y - rect.y)),
        }
    } else {
        return Ok(());
    }

    let mode = r.options.highlight_mode;
    if mode.is_active() {
        match individuals.get(link.individual_id.as_str()) {
            Some(linked) if highlight::gender_matches(mode, linked.gender) => {
                let class = format!("pedigree-link highlighted {}", family.id);
                for style in highlight::stroke_styles(&linked.highlight_keys) {
                    write_path(out, &d, &class, Some(&style))?;
                }
            }
            Some(_) => {
                write_path(
                    out,
                    &d,
                    &format!("pedigree-link unhighlighted {}", family.id),
                    None,
                )?;
            }
            None => {
                log::warn!(
                    "family {}: pedigree link references unknown individual {}",
                    family.id,
                    link.individual_id
                );
                write_path(
                    out,
                    &d,
                    &format!("pedigree-link unhighlighted {}", family.id),
                    None,
                )?;
            }
        }
    } else {
        let kind = match link.link_type {
            PedigreeLinkType::Parent => "parent",
            PedigreeLinkType::Adopted => "adopted",
            PedigreeLinkType::Biological => "biological",
        };
        write_path(out, &d, &format!("pedigree-link {kind} {}", family.id), None)?;
    }
    Ok(())
}
