use carplot::api::{
    ChartStyle, ColorProperty, RenderOptions, RenderPhase, ScatterChart, ScatterChartConfig,
};
use carplot::core::{CarId, CarRecord, CylinderCount, FuelType, Manufacturer, Viewport, XAxisKind};
use carplot::error::PlotError;
use carplot::render::NullRenderer;
use carplot::source::CarDataSource;

fn car(id: u32, make: Manufacturer, price: f64, cylinders: CylinderCount) -> CarRecord {
    CarRecord {
        id: CarId::new(id),
        price,
        manufacturer: make,
        fuel_type: FuelType::Gas,
        cylinder_count: cylinders,
        horsepower: 60.0 + price / 500.0,
        city_mpg: 18.0 + price / 5_000.0,
        highway_mpg: 24.0 + price / 5_000.0,
    }
}

fn loaded_source() -> CarDataSource {
    let source = CarDataSource::new();
    source
        .set_data(vec![
            car(1, Manufacturer::Honda, 10_000.0, CylinderCount::Four),
            car(2, Manufacturer::Bmw, 50_000.0, CylinderCount::Eight),
        ])
        .expect("load");
    source
}

fn chart_for(source: &CarDataSource) -> ScatterChart<NullRenderer> {
    ScatterChart::new(
        NullRenderer::default(),
        source,
        ScatterChartConfig::new(Viewport::new(800, 600)).with_x_axis(XAxisKind::Prices),
        ChartStyle::default(),
    )
    .expect("chart construction")
}

#[test]
fn invalid_viewport_fails_construction_immediately() {
    let source = loaded_source();
    let result = ScatterChart::new(
        NullRenderer::default(),
        &source,
        ScatterChartConfig::new(Viewport::new(0, 0)),
        ChartStyle::default(),
    );
    assert!(matches!(result, Err(PlotError::InvalidViewport { .. })));
}

#[test]
fn full_render_plots_one_point_per_record_per_panel() {
    let source = loaded_source();
    let chart = chart_for(&source);

    chart.render().expect("full render");

    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 6, "2 records across 3 panels");
    assert!(frame.lines.len() >= 12, "axis lines and ticks per panel");
    assert!(!frame.texts.is_empty(), "tick labels and panel titles");
    assert_eq!(chart.stats().full_passes, 1);
    assert_eq!(chart.stats().patch_passes, 0);
    assert_eq!(chart.render_phase(), RenderPhase::Idle);
}

#[test]
fn selection_change_patches_decorations_without_a_full_pass() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");

    source.select(CarId::new(1));

    let stats = chart.stats();
    assert_eq!(stats.full_passes, 1, "selection must not rerun layout");
    assert_eq!(stats.patch_passes, 1);

    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 9, "3 outlined copies above the base points");
    let outlined = frame
        .circles
        .iter()
        .filter(|circle| circle.stroke_width > 0.0)
        .count();
    assert_eq!(outlined, 3);

    source.unselect(CarId::new(1));
    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 6);
    assert_eq!(chart.stats().patch_passes, 2);
}

#[test]
fn focus_change_applies_glow_and_repeat_focus_is_idempotent() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");

    source.set_current(Some(CarId::new(2)));
    let frame = chart.current_frame().expect("retained scene");
    let glowing = frame
        .circles
        .iter()
        .filter(|circle| circle.halo_radius > 0.0)
        .count();
    assert_eq!(glowing, 3, "one glow per panel");
    assert_eq!(frame.circles.len(), 9);

    // The same focus arriving again must not stack another glow.
    source.set_current(Some(CarId::new(2)));
    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 9);

    source.set_current(None);
    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 6);
}

#[test]
fn focused_selected_point_gets_the_wider_glow() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");

    source.select(CarId::new(2));
    source.set_current(Some(CarId::new(2)));

    let style = ChartStyle::default();
    let frame = chart.current_frame().expect("retained scene");
    let halos: Vec<f64> = frame
        .circles
        .iter()
        .filter(|circle| circle.halo_radius > 0.0)
        .map(|circle| circle.halo_radius)
        .collect();
    assert_eq!(halos.len(), 3);
    for halo in halos {
        assert_eq!(
            halo,
            style.glow_radius_px + style.selected_stroke_width_px
        );
    }
}

#[test]
fn data_change_triggers_a_full_rerender() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");

    source
        .set_data(vec![car(7, Manufacturer::Mazda, 9_000.0, CylinderCount::Four)])
        .expect("reload");

    let stats = chart.stats();
    assert_eq!(stats.full_passes, 2);
    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 3, "one surviving record across 3 panels");
}

#[test]
fn stale_selection_after_reload_renders_without_decorations() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");
    source.select(CarId::new(1));

    source
        .set_data(vec![car(7, Manufacturer::Mazda, 9_000.0, CylinderCount::Four)])
        .expect("reload");

    // id 1 is dangling now; the rebuilt scene simply has no visuals for it.
    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 3);
    assert!(frame.circles.iter().all(|circle| circle.stroke_width == 0.0));
}

#[test]
fn empty_dataset_renders_a_degenerate_but_stable_chart() {
    let source = CarDataSource::new();
    source.set_data(Vec::new()).expect("empty load");
    let chart = chart_for(&source);

    chart.render().expect("degenerate render must not fail");

    let frame = chart.current_frame().expect("retained scene");
    assert!(frame.circles.is_empty());
    assert!(!frame.lines.is_empty(), "axes still render");
}

#[test]
fn single_record_dataset_produces_finite_point_positions() {
    let source = CarDataSource::new();
    source
        .set_data(vec![car(1, Manufacturer::Audi, 17_500.0, CylinderCount::Five)])
        .expect("load");
    let chart = chart_for(&source);

    chart.render().expect("degenerate domains render");

    let frame = chart.current_frame().expect("retained scene");
    assert_eq!(frame.circles.len(), 3);
    for circle in &frame.circles {
        assert!(circle.cx.is_finite());
        assert!(circle.cy.is_finite());
    }
}

#[test]
fn pointer_input_routes_through_the_data_source() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");

    let probe = chart.current_frame().expect("retained scene").circles[0];
    chart.pointer_move(probe.cx, probe.cy).expect("hover");
    let focused = source.current().expect("a point under the cursor");

    chart.click(probe.cx, probe.cy).expect("click");
    assert!(source.is_selected(focused), "click toggles via the source");

    chart.pointer_leave();
    assert_eq!(source.current(), None);

    // Far away from any point: focus clears, clicks are a no-op.
    chart.pointer_move(1.0, 1.0).expect("hover nothing");
    assert_eq!(source.current(), None);
    chart.click(1.0, 1.0).expect("click nothing");
    assert!(source.is_selected(focused));
}

#[test]
fn render_with_switches_the_x_axis_and_persists_it() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");
    assert_eq!(chart.config().x_axis, XAxisKind::Prices);

    chart
        .render_with(RenderOptions::x_axis(XAxisKind::Manufacturers))
        .expect("re-render");

    assert_eq!(chart.config().x_axis, XAxisKind::Manufacturers);
    assert_eq!(chart.stats().full_passes, 2);

    let frame = chart.current_frame().expect("retained scene");
    let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert!(labels.contains(&"bmw"));
    assert!(labels.contains(&"honda"));
}

#[test]
fn render_with_switches_the_color_property() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");

    chart
        .render_with(RenderOptions::color_property(ColorProperty::FuelType))
        .expect("re-render");

    assert_eq!(chart.config().color_property, ColorProperty::FuelType);
    // Both records run on gas, so every point now shares one fill.
    let frame = chart.current_frame().expect("retained scene");
    let first = frame.circles[0].fill;
    assert!(frame.circles.iter().all(|circle| circle.fill == first));
}

#[test]
fn too_small_viewport_aborts_the_pass_and_keeps_the_previous_scene() {
    let source = loaded_source();
    let chart = ScatterChart::new(
        NullRenderer::default(),
        &source,
        ScatterChartConfig::new(Viewport::new(60, 40)).with_x_axis(XAxisKind::Prices),
        ChartStyle::default(),
    )
    .expect("small but valid viewport constructs");

    assert!(matches!(chart.render(), Err(PlotError::InvalidData(_))));
    assert_eq!(chart.stats().full_passes, 0);
    assert!(chart.current_frame().is_none());
    assert_eq!(chart.render_phase(), RenderPhase::Idle);
}

#[test]
fn disposed_chart_stops_reacting_but_keeps_its_scene() {
    let source = loaded_source();
    let chart = chart_for(&source);
    chart.render().expect("full render");

    chart.dispose();
    source.select(CarId::new(1));
    source
        .set_data(vec![car(7, Manufacturer::Mazda, 9_000.0, CylinderCount::Four)])
        .expect("reload");

    let stats = chart.stats();
    assert_eq!(stats.full_passes, 1);
    assert_eq!(stats.patch_passes, 0);
    assert_eq!(
        chart.current_frame().expect("scene kept").circles.len(),
        6,
        "scene still shows the pre-dispose dataset"
    );

    // Disposal is idempotent.
    chart.dispose();
}

#[test]
fn renderer_observes_every_committed_pass() {
    let source = loaded_source();
    let chart = chart_for(&source);

    chart.render().expect("full render");
    source.select(CarId::new(1));

    let renderer = chart.renderer();
    assert_eq!(renderer.render_count, 2);
    assert_eq!(renderer.last_circle_count, 9);
}

#[test]
fn chart_config_round_trips_through_json() {
    let config = ScatterChartConfig::new(Viewport::new(640, 480))
        .with_x_axis(XAxisKind::Prices)
        .with_color_property(ColorProperty::FuelType);
    let json = serde_json::to_string(&config).expect("serialize");
    let restored: ScatterChartConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, config);
}
