mod families;
mod highlight;
mod individuals;
mod labels;
mod xml;

use crate::config::RenderOptions;
use crate::error::RenderError;
use crate::format::{AgeFormatter, DateFormatter};
use crate::model::{BoundaryRect, GenoMapData, Individual};
use crate::text_metrics::FontMetrics;
use std::collections::HashMap;
use std::io::{self, Write};
use xml::escape_xml;

/// Draws one laid-out genogram map as an SVG document. Positions are
/// taken verbatim from the model; the renderer only transforms
/// coordinates, measures text, and emits markup.
pub struct SvgRenderer<'a> {
    pub(crate) metrics: &'a dyn FontMetrics,
    pub(crate) dates: &'a dyn DateFormatter,
    pub(crate) ages: &'a dyn AgeFormatter,
    pub(crate) options: &'a RenderOptions,
}

/// Document coordinates grow upward from an arbitrary origin; image
/// coordinates grow downward from the map's top-left corner. The
/// half-line-height bias keeps the first text line visually centered
/// on its anchor.
pub(crate) struct Viewport {
    pub(crate) shift_x: i32,
    pub(crate) shift_y: i32,
}

impl Viewport {
    fn new(bounds: BoundaryRect, line_height: i32) -> Self {
        Viewport {
            shift_x: bounds.top_left.x,
            shift_y: bounds.top_left.y + line_height / 2,
        }
    }

    pub(crate) fn x(&self, doc_x: i32) -> i32 {
        doc_x - self.shift_x
    }

    pub(crate) fn y(&self, doc_y: i32) -> i32 {
        self.shift_y - doc_y
    }
}

impl<'a> SvgRenderer<'a> {
    pub fn new(
        metrics: &'a dyn FontMetrics,
        dates: &'a dyn DateFormatter,
        ages: &'a dyn AgeFormatter,
        options: &'a RenderOptions,
    ) -> Self {
        SvgRenderer {
            metrics,
            dates,
            ages,
            options,
        }
    }

    pub fn render<W: Write>(&self, data: &GenoMapData, out: &mut W) -> Result<(), RenderError> {
        self.render_map(data, out)?;
        Ok(())
    }

    pub fn render_to_string(&self, data: &GenoMapData) -> Result<String, RenderError> {
        let mut buffer = Vec::new();
        self.render(data, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn render_map(&self, data: &GenoMapData, out: &mut dyn Write) -> io::Result<()> {
        let map = &data.geno_map;
        let bounds = map.boundary_rect;
        let vp = Viewport::new(bounds, self.options.line_height);

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg id="{}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {} {}">"#,
            escape_xml(&map.id),
            bounds.width(),
            bounds.height(),
        )?;

        let mut clip_counter = 0;
        for label in &data.labels {
            if self.options.is_unsupported_color(&label.style.fill_color) {
                log::debug!(
                    "map {}: skipping label with unsupported fill {}",
                    map.id,
                    label.style.fill_color
                );
                continue;
            }
            labels::render_label(out, self, &vp, label, &mut clip_counter)?;
        }

        // Anonymized individuals keep their map entry so family lines can
        // still resolve them; they are just never drawn.
        let individual_map: HashMap<&str, &Individual> = data
            .individuals
            .iter()
            .map(|individual| (individual.id.as_str(), individual))
            .collect();

        for family in &data.families {
            families::render_family(out, self, &vp, &individual_map, family)?;
        }

        for individual in &data.individuals {
            if !individual.is_anonymized {
                individuals::render_individual(out, self, &vp, individual)?;
            }
        }

        writeln!(out, "</svg>")?;

        log::debug!(
            "map {}: rendered {} individuals, {} families, {} labels",
            map.id,
            data.individuals.len(),
            data.families.len(),
            data.labels.len(),
        );
        Ok(())
    }
}
