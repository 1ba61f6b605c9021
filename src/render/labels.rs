use super::xml::{escape_xml, fmt_num};
use super::{SvgRenderer, Viewport};
use crate::config::{font_scale, stroke_scale};
use crate::model::{HAlign, Label, VAlign};
use crate::text::wrap;
use std::io::{self, Write};

// Baseline-to-baseline distance as a multiple of the font size.
const LINE_SPACING: f32 = 1.36;

pub(crate) fn render_label(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    label: &Label,
    clip_counter: &mut usize,
) -> io::Result<()> {
    let rect = label.rect;
    let style = &label.style;
    let rect_x = vp.x(rect.x);
    let rect_y = vp.y(rect.y);

    let stroke_width = stroke_scale(style.border.size) * 3.0;
    if r.options.monochrome_labels {
        writeln!(
            out,
            r#"<rect x="{rect_x}" y="{rect_y}" width="{}" height="{}" class="monochrome-label" style="stroke-width: {}"/>"#,
            rect.width,
            rect.height,
            fmt_num(stroke_width),
        )?;
    } else {
        writeln!(
            out,
            r#"<rect x="{rect_x}" y="{rect_y}" width="{}" height="{}" style="fill: {};stroke: {};stroke-width: {}"/>"#,
            rect.width,
            rect.height,
            escape_xml(&style.fill_color),
            escape_xml(&style.border.color),
            fmt_num(stroke_width),
        )?;
    }

    let padding = style.padding;
    let clip_id = format!("idx-{}", *clip_counter);
    *clip_counter += 1;

    writeln!(out, r#"<clipPath id="{clip_id}">"#)?;
    writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
        rect_x + padding,
        rect_y + padding,
        rect.width - 2 * padding,
        rect.height - 2 * padding,
    )?;
    writeln!(out, "</clipPath>")?;

    let Some(text) = label.text.as_deref() else {
        return Ok(());
    };

    let font_size = font_scale(style.size) * r.options.main_font_size;
    let max_width = (rect.width - 2 * padding) as f32;

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        lines.extend(wrap(paragraph, max_width, font_size, r.metrics));
    }
    if lines.is_empty() {
        return Ok(());
    }

    let ascent = r.metrics.ascent(font_size);
    let descent = r.metrics.descent(font_size);

    let (base_x, anchor) = match style.horizontal_alignment {
        HAlign::Left => (rect_x + padding, "start"),
        HAlign::Center => (rect_x + rect.width / 2, "middle"),
        HAlign::Right => (rect_x + rect.width - padding, "end"),
    };

    let available = (rect.height - 2 * padding) as f32;
    let block = ascent + (lines.len() - 1) as f32 * LINE_SPACING * font_size + descent;

    let mut base_y = (rect_y + padding) as f32 + ascent;
    if block < available {
        match style.vertical_alignment {
            VAlign::Top => {}
            VAlign::Bottom => {
                base_y = (rect_y + rect.height - padding) as f32 - block + ascent;
            }
            VAlign::Center => {
                base_y = (rect_y + padding) as f32 + (available - block) / 2.0 + ascent;
            }
        }
    }

    for (i, line) in lines.iter().enumerate() {
        let y = base_y + LINE_SPACING * i as f32 * font_size;
        writeln!(
            out,
            r#"<text clip-path="url(#{clip_id})" text-anchor="{anchor}" x="{base_x}" y="{}" style="font-size:{}px">{}</text>"#,
            fmt_num(y),
            fmt_num(font_size),
            escape_xml(line),
        )?;
    }

    // Clipped-away overflow gets a red double arrow under the box as a
    // warning marker.
    if block > available {
        let line_width = rect.width / 2;
        let arrow_width = 6;
        let start_x = rect_x + rect.width / 4;
        let end_x = start_x + line_width;
        let start_y = rect_y + rect.height - padding + 2;
        let dip = fmt_num(start_y as f32 + 0.7 * arrow_width as f32);

        let mut d = format!("M{start_x} {start_y}h{line_width}");
        if line_width > 2 * arrow_width {
            d.push_str(&format!(
                "M{start_x} {start_y}L{} {dip}L{} {start_y}M{end_x} {start_y}L{} {dip}L{} {start_y}",
                start_x + arrow_width / 2,
                start_x + arrow_width,
                end_x - arrow_width / 2,
                end_x - arrow_width,
            ));
        }
        writeln!(
            out,
            r#"<path d="{d}" style="stroke: red; stroke-width: 0.5px; fill: none;"/>"#
        )?;
    }
    Ok(())
}
