use super::highlight;
use super::xml::{escape_xml, fmt_num, write_path};
use super::{SvgRenderer, Viewport};
use crate::config::DisplayStyle;
use crate::model::{Gender, GenoDate, Individual, Rect};
use crate::text::wrap;
use std::io::{self, Write};

pub(crate) fn render_individual(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    individual: &Individual,
) -> io::Result<()> {
    match &individual.hyperlink {
        Some(link) => writeln!(
            out,
            r#"<g id="{}" data-target-id="{}">"#,
            escape_xml(&individual.id),
            escape_xml(&link.id)
        )?,
        None => writeln!(out, r#"<g id="{}">"#, escape_xml(&individual.id))?,
    }

    render_dates(out, r, vp, individual)?;
    render_symbol(out, r, vp, individual)?;
    render_age_and_deceased(out, r, vp, individual)?;

    // Hyperlinked individuals get the clickable overlay first so the
    // label stays on top of it.
    if individual.hyperlink.is_some() {
        render_active_area(out, vp, individual)?;
        render_name_label(out, r, vp, individual)?;
    } else {
        render_name_label(out, r, vp, individual)?;
        render_active_area(out, vp, individual)?;
    }

    writeln!(out, "</g>")
}

fn format_date(r: &SvgRenderer, date: &GenoDate) -> String {
    if r.options.display_style.year_only() {
        date.year.to_string()
    } else {
        r.dates.format(date)
    }
}

fn render_dates(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    individual: &Individual,
) -> io::Result<()> {
    let style = r.options.display_style;
    if style == DisplayStyle::Nothing {
        return Ok(());
    }

    let mut lines: Vec<String> = Vec::new();
    if style.includes_id() {
        lines.push(individual.id.clone());
    }

    if style.shows_dates() {
        let birth_date = individual.birth.as_ref().and_then(|birth| birth.date);
        let death_date = individual.death.as_ref().and_then(|death| death.date);

        let mut dates: Vec<String> = Vec::new();
        if let Some(date) = birth_date {
            dates.push(format_date(r, &date));
        }
        if let Some(date) = death_date {
            let text = format_date(r, &date);
            dates.push(if birth_date.is_some() {
                text
            } else {
                format!("{} {text}", r.options.death_abbrev)
            });
        }

        if style.separate_lines() {
            lines.extend(dates);
        } else if !dates.is_empty() {
            lines.push(dates.join(" – "));
        }
    }

    let rect = Rect::from(individual.boundary_rect);
    let line_height = r.options.line_height;
    let base_top_y = vp.y(rect.y) + line_height / 2;
    let x = vp.x(individual.position.x);

    for (i, label) in lines.iter().enumerate() {
        let label_width = r.metrics.string_width(label, r.options.main_font_size) as i32;
        let top_y = base_top_y + i as i32 * line_height;
        writeln!(
            out,
            r#"<rect x="{}" y="{top_y}" width="{label_width}" height="{line_height}" class="individual-label"/>"#,
            x - label_width / 2,
        )?;
        writeln!(
            out,
            r#"<text x="{x}" y="{}" class="individual-label">{}</text>"#,
            fmt_num(top_y as f32 - r.options.text_padding() + line_height as f32),
            escape_xml(label)
        )?;
    }
    Ok(())
}

fn render_symbol(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    individual: &Individual,
) -> io::Result<()> {
    let x = vp.x(individual.position.x);
    let y = vp.y(individual.position.y);
    let mode = r.options.highlight_mode;

    match individual.gender {
        Gender::Male => {
            if mode == crate::config::HighlightMode::Paternal {
                let d = format!("M{} {}h18v18h-18z", x - 9, y - 9);
                for style in highlight::stroke_styles(&individual.highlight_keys) {
                    write_path(out, &d, "individual-symbol highlighted", Some(&style))?;
                }
            } else {
                let unhighlighted = mode == crate::config::HighlightMode::Maternal;
                writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="18" height="18" class="individual-symbol{}"/>"#,
                    x - 9,
                    y - 9,
                    if unhighlighted { " unhighlighted" } else { "" }
                )?;
            }
        }
        Gender::Female => {
            if mode == crate::config::HighlightMode::Maternal {
                let d = format!("M{x} {y}m-9 0a9 9 0 1 0 18 0a9 9 0 1 0 -18 0");
                for style in highlight::stroke_styles(&individual.highlight_keys) {
                    write_path(out, &d, "individual-symbol highlighted", Some(&style))?;
                }
            } else {
                let unhighlighted = mode == crate::config::HighlightMode::Paternal;
                writeln!(
                    out,
                    r#"<circle cx="{x}" cy="{y}" r="9" class="individual-symbol{}"/>"#,
                    if unhighlighted { " unhighlighted" } else { "" }
                )?;
            }
        }
        Gender::Unknown => {
            writeln!(
                out,
                r#"<rect x="{}" y="{}" width="18" height="18" class="individual-symbol-background"/>"#,
                x - 9,
                y - 9,
            )?;
            writeln!(
                out,
                r#"<text x="{x}" y="{}" class="individual-symbol">?</text>"#,
                y + 4
            )?;
        }
    }
    Ok(())
}

fn render_age_and_deceased(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    individual: &Individual,
) -> io::Result<()> {
    let mode = r.options.highlight_mode;
    let x = vp.x(individual.position.x);
    let y = vp.y(individual.position.y);

    if individual.is_deceased {
        // The cross overshoots the square a little; the circle variant is
        // scaled down to match its smaller silhouette.
        let delta = if individual.gender == Gender::Male { 9.0 } else { 6.4 };
        let fx = x as f32;
        let fy = y as f32;
        let d = format!(
            "M{} {}L{} {}M{} {}L{} {}",
            fmt_num(fx - delta),
            fmt_num(fy - delta),
            fmt_num(fx + delta),
            fmt_num(fy + delta),
            fmt_num(fx - delta),
            fmt_num(fy + delta),
            fmt_num(fx + delta),
            fmt_num(fy - delta),
        );

        if mode.is_active() {
            if highlight::gender_matches(mode, individual.gender) {
                for style in highlight::stroke_styles(&individual.highlight_keys) {
                    write_path(out, &d, "individual-deceased highlighted", Some(&style))?;
                }
            } else {
                write_path(out, &d, "individual-deceased unhighlighted", None)?;
            }
        } else {
            write_path(out, &d, "individual-deceased", None)?;
        }
    }

    let has_death_date = individual
        .death
        .as_ref()
        .and_then(|death| death.date)
        .is_some();
    // An age without a recorded death date would be misleading for the
    // deceased, so it is suppressed.
    let age = if individual.is_deceased && !has_death_date {
        None
    } else {
        r.ages
            .format(individual.birth.as_ref(), individual.death.as_ref())
    };

    if let Some(age) = age {
        let age_font = r.options.age_font_size;
        let age_width = r.metrics.string_width(&age, age_font);
        writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" class="individual-age"/>"#,
            fmt_num(x as f32 - age_width / 2.0),
            fmt_num(y as f32 - age_font / 2.0),
            fmt_num(age_width),
            fmt_num(age_font),
        )?;
        writeln!(
            out,
            r#"<text x="{x}" y="{}" class="individual-age">{}</text>"#,
            fmt_num(y as f32 + 0.7 * age_font / 2.0),
            escape_xml(&age)
        )?;
    }
    Ok(())
}

fn render_name_label(
    out: &mut dyn Write,
    r: &SvgRenderer,
    vp: &Viewport,
    individual: &Individual,
) -> io::Result<()> {
    let Some(name) = &individual.name else {
        return Ok(());
    };

    let rect = Rect::from(individual.boundary_rect);
    let lines = wrap(
        &name.display(),
        (rect.width - 16) as f32,
        r.options.main_font_size,
        r.metrics,
    );

    let line_height = r.options.line_height;
    let base_top_y = vp.y(individual.position.y) + line_height;
    let x = vp.x(individual.position.x);

    for (i, line) in lines.iter().enumerate() {
        let line_width = r.metrics.string_width(line, r.options.main_font_size);
        let top_y = base_top_y + i as i32 * line_height;
        writeln!(
            out,
            r#"<rect x="{}" y="{top_y}" width="{}" height="{line_height}" class="individual-label"/>"#,
            fmt_num(x as f32 - line_width / 2.0),
            fmt_num(line_width),
        )?;
    }

    let class = if individual.hyperlink.is_some() {
        "individual-label-hyperlink"
    } else {
        "individual-label"
    };
    for (i, line) in lines.iter().enumerate() {
        let top_y = base_top_y + i as i32 * line_height;
        writeln!(
            out,
            r#"<text x="{x}" y="{}" class="{class}">{}</text>"#,
            fmt_num(top_y as f32 - r.options.text_padding() + line_height as f32),
            escape_xml(line)
        )?;
    }
    Ok(())
}

fn render_active_area(
    out: &mut dyn Write,
    vp: &Viewport,
    individual: &Individual,
) -> io::Result<()> {
    let box_size = 8;
    let rect = Rect::from(individual.boundary_rect);
    writeln!(
        out,
        r#"<rect id="{}-bb" x="{}" y="{}" width="{}" height="{}" class="individual-active-area"/>"#,
        escape_xml(&individual.id),
        vp.x(rect.x) + box_size,
        vp.y(rect.y) + box_size,
        rect.width - 2 * box_size,
        rect.height - 2 * box_size,
    )
}
