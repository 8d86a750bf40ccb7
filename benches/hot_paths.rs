use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_globe::braille::BrailleCanvas;
use tui_globe::data::{
    resolve_highlights, CountryProperties, Feature, Shape, WorldFeatureCollection,
};
use tui_globe::map::{GlobeRenderer, OrthographicProjection, RenderLayers};
use tui_globe::view::{Rotation, ViewportMetrics};

/// 10° squares tiling most of the sphere, each with a 1° vertex spacing.
fn synthetic_world() -> WorldFeatureCollection {
    let mut features = Vec::new();
    for lat in (-80..80).step_by(10) {
        for lon in (-180..180).step_by(10) {
            let (lon, lat) = (lon as f64, lat as f64);
            let mut ring = Vec::new();
            for i in 0..10 {
                ring.push((lon + i as f64, lat));
            }
            for i in 0..10 {
                ring.push((lon + 10.0, lat + i as f64));
            }
            for i in 0..10 {
                ring.push((lon + 10.0 - i as f64, lat + 10.0));
            }
            for i in 0..10 {
                ring.push((lon, lat + 10.0 - i as f64));
            }
            ring.push((lon, lat));

            features.push(Feature {
                properties: CountryProperties {
                    name: Some(format!("Tile {lon} {lat}")),
                    ..CountryProperties::default()
                },
                shape: Shape::Polygon(vec![ring]),
            });
        }
    }
    WorldFeatureCollection { features }
}

fn bench_render(c: &mut Criterion) {
    let world = synthetic_world();
    let names: Vec<String> = (0..20)
        .map(|i| format!("tile {} 0", -180 + i * 10))
        .collect();
    let highlights = resolve_highlights(&world, &names);
    let metrics = ViewportMetrics::new(400.0, 200.0).expect("valid viewport");
    let renderer = GlobeRenderer::default();
    let mut canvas = BrailleCanvas::new(200, 50);
    let mut rotation = Rotation::default();

    c.bench_function("render_frame", |b| {
        b.iter(|| {
            rotation.advance(0.3);
            let projection = OrthographicProjection::new(rotation, metrics.base_radius, metrics.center());
            renderer.render(
                &mut canvas,
                &projection,
                metrics.base_radius,
                Some(RenderLayers {
                    world: &world,
                    highlights: &highlights,
                }),
            );
            black_box(&canvas);
        })
    });

    c.bench_function("render_loading_disk", |b| {
        let projection = OrthographicProjection::new(rotation, metrics.base_radius, metrics.center());
        b.iter(|| {
            renderer.render(&mut canvas, &projection, metrics.base_radius, None);
            black_box(&canvas);
        })
    });
}

fn bench_highlights(c: &mut Criterion) {
    let world = synthetic_world();
    let names: Vec<String> = (0..50)
        .map(|i| format!("Tile {} {}", -180 + (i % 36) * 10, -80 + (i % 16) * 10))
        .collect();

    c.bench_function("resolve_highlights", |b| {
        b.iter(|| black_box(resolve_highlights(black_box(&world), black_box(&names))))
    });
}

criterion_group!(benches, bench_render, bench_highlights);
criterion_main!(benches);
