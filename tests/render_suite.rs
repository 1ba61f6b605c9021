use std::path::Path;

use genogram_renderer::SvgRenderer;
use genogram_renderer::config::{HighlightMode, RenderOptions};
use genogram_renderer::format::{DayMonthYearFormatter, YearsAgeFormatter};
use genogram_renderer::model::{GenoDate, GenoDocument};
use genogram_renderer::text_metrics::CharTableMetrics;

fn fixture(name: &str) -> GenoDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    serde_json::from_str(&input).expect("fixture parse failed")
}

// Table metrics and a pinned reference date keep the output byte-stable.
fn render_with(doc: &GenoDocument, options: &RenderOptions) -> String {
    let metrics = CharTableMetrics::new();
    let dates = DayMonthYearFormatter;
    let ages = YearsAgeFormatter::new(GenoDate { year: 2020, month: Some(1), day: Some(1) });
    let renderer = SvgRenderer::new(&metrics, &dates, &ages, options);
    renderer
        .render_to_string(&doc.maps[0])
        .expect("render failed")
}

fn render(name: &str) -> String {
    render_with(&fixture(name), &RenderOptions::default())
}

fn index_of(svg: &str, needle: &str) -> usize {
    svg.find(needle)
        .unwrap_or_else(|| panic!("missing {needle:?} in:\n{svg}"))
}

#[test]
fn render_all_fixtures() {
    for name in ["family.json", "highlight.json"] {
        let svg = render(name);
        assert!(svg.contains("<svg"), "{name}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{name}: missing </svg tag");
    }
}

#[test]
fn document_shell_declares_the_map_viewbox() {
    let svg = render("family.json");
    assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"), "{svg}");
    assert!(
        svg.contains(
            r#"<svg id="gm1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 420 600">"#
        ),
        "{svg}"
    );
    assert!(svg.ends_with("</svg>\n"), "{svg}");
}

#[test]
fn labels_render_under_families_under_individuals() {
    let svg = render("family.json");
    let label = index_of(&svg, r#"<clipPath id="idx-0">"#);
    let family = index_of(&svg, r#"class="family-line f1""#);
    let individual = index_of(&svg, r#"<g id="i1">"#);
    assert!(label < family && family < individual, "{svg}");
}

#[test]
fn family_lines_and_links_trace_the_union() {
    let svg = render("family.json");
    // Top line across the parents, marriage chip above it, closed-union
    // glyph at its right end.
    assert!(svg.contains(r#"<path d="M110 87h180" class="family-line f1"/>"#), "{svg}");
    assert!(svg.contains(r#"<rect x="182" y="68.8" width="36" height="14" class="family-label"/>"#), "{svg}");
    assert!(svg.contains(r#"<text x="200" y="80.8" class="family-label">m. 1975</text>"#), "{svg}");
    assert!(
        svg.contains(r#"<path d="M283.5 90h5v5h-5z" class="family-line-no-more-children"/>"#),
        "{svg}"
    );
    // Descent drop and the (degenerate single-child) bottom line.
    assert!(svg.contains(r#"<path d="M200 87v80" class="family-line f1"/>"#), "{svg}");
    assert!(svg.contains(r#"<path d="M200 167h0" class="family-line f1"/>"#), "{svg}");
    // Each pedigree link climbs from its attachment point.
    assert!(svg.contains(r#"<path d="M110 127v-40" class="pedigree-link parent f1"/>"#), "{svg}");
    assert!(svg.contains(r#"<path d="M290 127v-40" class="pedigree-link parent f1"/>"#), "{svg}");
    assert!(svg.contains(r#"<path d="M200 197v-30" class="pedigree-link biological f1"/>"#), "{svg}");
}

#[test]
fn deceased_spouse_gets_cross_dates_and_age_at_death() {
    let svg = render("family.json");
    assert!(svg.contains(r#"<circle cx="290" cy="87" r="9" class="individual-symbol"/>"#), "{svg}");
    assert!(
        svg.contains(
            r#"<path d="M283.6 80.6L296.4 93.4M283.6 93.4L296.4 80.6" class="individual-deceased"/>"#
        ),
        "{svg}"
    );
    assert!(svg.contains(r#"<text x="290" y="66" class="individual-label">1952 – 2010</text>"#), "{svg}");
    assert!(svg.contains(r#"<text x="290" y="90.15" class="individual-age">58</text>"#), "{svg}");
    // The maiden name wraps onto its own row below the display name.
    assert!(svg.contains(r#"<text x="290" y="113" class="individual-label">Mary Harper</text>"#), "{svg}");
    assert!(svg.contains(r#"<text x="290" y="127" class="individual-label">(Quinn)</text>"#), "{svg}");
}

#[test]
fn ages_count_whole_years_to_the_reference_date() {
    let svg = render("family.json");
    // Born 11 Feb 1950, reference 1 Jan 2020: the 70th birthday is ahead.
    assert!(svg.contains(r#"<rect x="105" y="82.5" width="10" height="9" class="individual-age"/>"#), "{svg}");
    assert!(svg.contains(r#"<text x="110" y="90.15" class="individual-age">69</text>"#), "{svg}");
    assert!(svg.contains(r#"<text x="200" y="240.15" class="individual-age">39</text>"#), "{svg}");
}

#[test]
fn hyperlinked_individual_keeps_the_label_clickable() {
    let svg = render("family.json");
    assert!(svg.contains(r#"<g id="i3" data-target-id="gm2">"#), "{svg}");
    assert!(
        svg.contains(r#"<rect id="i3-bb" x="158" y="205" width="84" height="64" class="individual-active-area"/>"#),
        "{svg}"
    );
    // Linked: active area first so the label text stays on top.
    let area = index_of(&svg, r#"id="i3-bb""#);
    let label = index_of(&svg, r#"<text x="200" y="263" class="individual-label-hyperlink">Tom Harper</text>"#);
    assert!(area < label, "{svg}");
    // Unlinked: label first, overlay last.
    let plain_label = index_of(&svg, r#">John Harper</text>"#);
    let plain_area = index_of(&svg, r#"id="i1-bb""#);
    assert!(plain_label < plain_area, "{svg}");
}

#[test]
fn annotation_boxes_scale_text_and_clip_to_the_rect() {
    let svg = render("family.json");
    assert!(
        svg.contains(
            r#"<rect x="10" y="17" width="150" height="40" style="fill: #FFFFCC;stroke: #999999;stroke-width: 2.1"/>"#
        ),
        "{svg}"
    );
    assert!(svg.contains(r#"<clipPath id="idx-0">"#), "{svg}");
    assert!(svg.contains(r#"<rect x="12" y="19" width="146" height="36"/>"#), "{svg}");
    assert!(
        svg.contains(
            r#"<text clip-path="url(#idx-0)" text-anchor="start" x="12" y="29.04" style="font-size:11.09px">Drawn from parish records</text>"#
        ),
        "{svg}"
    );
    // An unrecognized size tier falls back to neutral scale on both the
    // border stroke and the text.
    assert!(svg.contains(r#"style="fill: #EEEEEE;stroke: #000000;stroke-width: 3""#), "{svg}");
    assert!(svg.contains(r#"text-anchor="middle" x="225""#), "{svg}");
    assert!(svg.contains(r#"style="font-size:10px">Key</text>"#), "{svg}");
}

#[test]
fn twins_share_one_stem_point_on_the_bottom_line() {
    let svg = render("highlight.json");
    assert!(svg.contains(r#"<path d="M160 197L170 167" class="pedigree-link biological f1"/>"#), "{svg}");
    assert!(svg.contains(r#"<path d="M180 197L170 167" class="pedigree-link biological f1"/>"#), "{svg}");
}

#[test]
fn paternal_highlight_traces_the_father_line() {
    let options = RenderOptions {
        highlight_mode: HighlightMode::Paternal,
        ..RenderOptions::default()
    };
    let svg = render_with(&fixture("highlight.json"), &options);

    // The father's half of the top line stacks one stroke per key; the
    // mother's half dims exactly once.
    assert_eq!(svg.matches(r#"d="M100 87H200""#).count(), 2, "{svg}");
    assert!(
        svg.contains(r#"<path d="M100 87H200" class="family-line highlighted f1" style="stroke:#ff0000"/>"#),
        "{svg}"
    );
    assert!(
        svg.contains(
            r#"<path d="M100 87H200" class="family-line highlighted f1" style="stroke:#0000ff;stroke-dasharray:5,5;stroke-linecap:butt;fill:none"/>"#
        ),
        "{svg}"
    );
    assert_eq!(
        svg.matches(r#"<path d="M200 87H300" class="family-line unhighlighted f1"/>"#).count(),
        1,
        "{svg}"
    );

    // Drop and bottom line repeat per key as well.
    assert_eq!(svg.matches(r#"d="M200 87v80""#).count(), 2, "{svg}");
    assert_eq!(svg.matches(r#"d="M140 167h120""#).count(), 2, "{svg}");

    // Parent links inherit the father's stack; children light up only
    // when their own gender matches the traced line.
    assert_eq!(svg.matches(r#"d="M100 127v-40""#).count(), 2, "{svg}");
    assert!(svg.contains(r#"<path d="M300 127v-40" class="pedigree-link unhighlighted f1"/>"#), "{svg}");
    assert!(
        svg.contains(r#"<path d="M160 197L170 167" class="pedigree-link highlighted f1" style="stroke:#ff0000"/>"#),
        "{svg}"
    );
    assert!(svg.contains(r#"<path d="M180 197L170 167" class="pedigree-link unhighlighted f1"/>"#), "{svg}");

    // Symbols and the deceased cross follow the same rule.
    assert!(
        svg.contains(r#"<path d="M91 78h18v18h-18z" class="individual-symbol highlighted" style="stroke:#ff0000"/>"#),
        "{svg}"
    );
    assert!(
        svg.contains(r#"<path d="M91 78L109 96M91 96L109 78" class="individual-deceased highlighted" style="stroke:#ff0000"/>"#),
        "{svg}"
    );
    assert!(svg.contains(r#"<circle cx="300" cy="87" r="9" class="individual-symbol unhighlighted"/>"#), "{svg}");
    assert!(svg.contains(r#"<circle cx="180" cy="197" r="9" class="individual-symbol unhighlighted"/>"#), "{svg}");
}

#[test]
fn maternal_highlight_renders_untyped_keys_black() {
    let options = RenderOptions {
        highlight_mode: HighlightMode::Maternal,
        ..RenderOptions::default()
    };
    let svg = render_with(&fixture("highlight.json"), &options);

    assert!(
        svg.contains(r#"<path d="M200 87H300" class="family-line highlighted f1" style="stroke:black"/>"#),
        "{svg}"
    );
    assert_eq!(
        svg.matches(r#"<path d="M100 87H200" class="family-line unhighlighted f1"/>"#).count(),
        1,
        "{svg}"
    );
    assert!(
        svg.contains(r#"<path d="M140 167h120" class="family-line highlighted f1" style="stroke:black"/>"#),
        "{svg}"
    );
    assert!(
        svg.contains(
            r#"<path d="M300 87m-9 0a9 9 0 1 0 18 0a9 9 0 1 0 -18 0" class="individual-symbol highlighted" style="stroke:black"/>"#
        ),
        "{svg}"
    );
    assert!(
        svg.contains(r#"<rect x="91" y="78" width="18" height="18" class="individual-symbol unhighlighted"/>"#),
        "{svg}"
    );
    assert!(
        svg.contains(r#"<path d="M91 78L109 96M91 96L109 78" class="individual-deceased unhighlighted"/>"#),
        "{svg}"
    );
    assert!(
        svg.contains(r#"<path d="M180 197L170 167" class="pedigree-link highlighted f1" style="stroke:#0000ff"/>"#),
        "{svg}"
    );
    assert!(svg.contains(r#"<path d="M160 197L170 167" class="pedigree-link unhighlighted f1"/>"#), "{svg}");
}
