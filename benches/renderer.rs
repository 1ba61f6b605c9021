use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use genogram_renderer::SvgRenderer;
use genogram_renderer::config::{HighlightMode, RenderOptions};
use genogram_renderer::format::{DayMonthYearFormatter, YearsAgeFormatter};
use genogram_renderer::model::{
    Birth, Border, BoundaryRect, Family, FamilyLineType, GenoDate, GenoMap, GenoMapData, Gender,
    HAlign, Individual, Label, LabelStyle, Name, PedigreeLink, PedigreeLinkType, Position, Rect,
    SizeTier, VAlign,
};
use genogram_renderer::text::wrap;
use genogram_renderer::text_metrics::{CharTableMetrics, FontMetrics};
use std::hint::black_box;

const CELL_W: i32 = 240;
const CELL_H: i32 = 220;

const LONG_NOTE: &str = "Emigrated from the old parish in the spring of 1887, crossed \
through Hamburg and Liverpool, and settled near the river where the first three children \
were born; the farm passed to the youngest son after the war and stayed in the family \
until the estate was divided in 1962.";

fn person(id: String, first: &str, gender: Gender, position: Position, birth_year: i32, keys: &[&str]) -> Individual {
    Individual {
        id,
        name: Some(Name {
            first: Some(first.to_string()),
            middle: None,
            last: Some("Holt".to_string()),
            last2: None,
        }),
        gender,
        birth: Some(Birth { date: Some(GenoDate { year: birth_year, month: Some(3), day: Some(14) }) }),
        death: None,
        position,
        boundary_rect: BoundaryRect {
            top_left: Position { x: position.x - 50, y: position.y + 40 },
            bottom_right: Position { x: position.x + 50, y: position.y - 40 },
        },
        hyperlink: None,
        highlight_keys: keys.iter().map(|k| k.to_string()).collect(),
        is_anonymized: false,
        is_deceased: false,
    }
}

fn child_link(id: String, position: Position) -> PedigreeLink {
    PedigreeLink {
        individual_id: id,
        link_type: PedigreeLinkType::Biological,
        position: Some(position),
        twin_position: None,
    }
}

/// A rows x cols grid of unions, two children each, with ancestry keys on
/// the father's side so highlight mode has strokes to stack.
fn synthetic_map(rows: usize, cols: usize) -> GenoMapData {
    let height = rows as i32 * CELL_H;
    let width = cols as i32 * CELL_W;
    let mut individuals = Vec::new();
    let mut families = Vec::new();
    let mut labels = Vec::new();

    for row in 0..rows {
        let top = height - row as i32 * CELL_H;
        labels.push(Label {
            rect: Rect { x: 10, y: top - 10, width: 160, height: 36 },
            style: LabelStyle {
                fill_color: "#FFFFCC".to_string(),
                border: Border { color: "#999999".to_string(), size: SizeTier::S },
                padding: 2,
                horizontal_alignment: HAlign::Left,
                vertical_alignment: VAlign::Top,
                size: SizeTier::S,
            },
            text: Some(LONG_NOTE.to_string()),
        });

        for col in 0..cols {
            let idx = row * cols + col;
            let left = col as i32 * CELL_W;
            let father = Position { x: left + 60, y: top - 40 };
            let mother = Position { x: left + 180, y: top - 40 };
            let child_a = Position { x: left + 80, y: top - 150 };
            let child_b = Position { x: left + 160, y: top - 150 };
            let birth_year = 1900 + (idx % 60) as i32;

            individuals.push(person(
                format!("ind{idx}f"),
                "Frans",
                Gender::Male,
                father,
                birth_year,
                &["#d62728", "#1f77b4"],
            ));
            individuals.push(person(
                format!("ind{idx}m"),
                "Mathilda",
                Gender::Female,
                mother,
                birth_year + 2,
                &[],
            ));
            individuals.push(person(
                format!("ind{idx}a"),
                "Axel",
                Gender::Male,
                child_a,
                birth_year + 25,
                &["#d62728"],
            ));
            individuals.push(person(
                format!("ind{idx}b"),
                "Beata",
                Gender::Female,
                child_b,
                birth_year + 27,
                &["#1f77b4"],
            ));

            families.push(Family {
                id: format!("fam{idx}"),
                position: Position { x: left + 120, y: top - 40 },
                top_boundary_rect: Some(BoundaryRect {
                    top_left: Position { x: father.x, y: top - 40 },
                    bottom_right: Position { x: mother.x, y: top - 45 },
                }),
                bottom_boundary_rect: Some(BoundaryRect {
                    top_left: Position { x: child_a.x, y: top - 100 },
                    bottom_right: Position { x: child_b.x, y: top - 105 },
                }),
                label: Some(format!("m. {}", birth_year + 22)),
                line_type: FamilyLineType::NoMoreChildren,
                pedigree_links: vec![
                    PedigreeLink {
                        individual_id: format!("ind{idx}f"),
                        link_type: PedigreeLinkType::Parent,
                        position: Some(Position { x: father.x, y: father.y - 40 }),
                        twin_position: None,
                    },
                    PedigreeLink {
                        individual_id: format!("ind{idx}m"),
                        link_type: PedigreeLinkType::Parent,
                        position: Some(Position { x: mother.x, y: mother.y - 40 }),
                        twin_position: None,
                    },
                    child_link(format!("ind{idx}a"), Position { x: child_a.x, y: child_a.y + 40 }),
                    child_link(format!("ind{idx}b"), Position { x: child_b.x, y: child_b.y + 40 }),
                ],
                father_id: Some(format!("ind{idx}f")),
                mother_id: Some(format!("ind{idx}m")),
            });
        }
    }

    GenoMapData {
        geno_map: GenoMap {
            id: "bench".to_string(),
            title: Some("Bench".to_string()),
            boundary_rect: BoundaryRect {
                top_left: Position { x: 0, y: height },
                bottom_right: Position { x: width, y: 0 },
            },
        },
        individuals,
        families,
        labels,
    }
}

fn bench_text_measure(c: &mut Criterion) {
    let metrics = CharTableMetrics::new();
    let mut group = c.benchmark_group("text_measure");
    for (name, sample) in [
        ("name", "Johann Sebastian Holt"),
        ("dates", "12 Mar 1945 – 3 Jul 2010"),
        ("paragraph", LONG_NOTE),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), sample, |b, text| {
            b.iter(|| {
                black_box(metrics.string_width(black_box(text), 10.0));
            });
        });
    }
    group.finish();
}

fn bench_wrap(c: &mut Criterion) {
    let metrics = CharTableMetrics::new();
    let mut group = c.benchmark_group("wrap");
    for (name, max_width) in [("narrow_84", 84.0f32), ("label_146", 146.0), ("wide_400", 400.0)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &max_width, |b, max| {
            b.iter(|| {
                let lines = wrap(black_box(LONG_NOTE), *max, 11.09, &metrics);
                black_box(lines.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let metrics = CharTableMetrics::new();
    let dates = DayMonthYearFormatter;
    let ages = YearsAgeFormatter::new(GenoDate { year: 2020, month: Some(1), day: Some(1) });
    let options = RenderOptions::default();
    let renderer = SvgRenderer::new(&metrics, &dates, &ages, &options);

    let mut group = c.benchmark_group("render_svg");
    for (name, rows, cols) in [("grid_2x2", 2, 2), ("grid_6x6", 6, 6), ("grid_12x12", 12, 12)] {
        let map = synthetic_map(rows, cols);
        group.bench_with_input(BenchmarkId::from_parameter(name), &map, |b, map| {
            b.iter(|| {
                let svg = renderer.render_to_string(black_box(map)).expect("render failed");
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_render_highlighted(c: &mut Criterion) {
    let metrics = CharTableMetrics::new();
    let dates = DayMonthYearFormatter;
    let ages = YearsAgeFormatter::new(GenoDate { year: 2020, month: Some(1), day: Some(1) });
    let options = RenderOptions {
        highlight_mode: HighlightMode::Paternal,
        ..RenderOptions::default()
    };
    let renderer = SvgRenderer::new(&metrics, &dates, &ages, &options);

    let mut group = c.benchmark_group("render_svg_highlighted");
    for (name, rows, cols) in [("grid_2x2", 2, 2), ("grid_6x6", 6, 6), ("grid_12x12", 12, 12)] {
        let map = synthetic_map(rows, cols);
        group.bench_with_input(BenchmarkId::from_parameter(name), &map, |b, map| {
            b.iter(|| {
                let svg = renderer.render_to_string(black_box(map)).expect("render failed");
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_text_measure, bench_wrap, bench_render, bench_render_highlighted
);
criterion_main!(benches);
