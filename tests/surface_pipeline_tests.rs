use std::cell::Cell;
use std::rc::Rc;

use gridchart_rs::api::{BarChart, BarChartEngine, ChartMode, RedrawHost};
use gridchart_rs::core::{
    CellRef, CoordinateAxis, DataGrid, LinearAxis, Orientation, PIXEL_OVERSHOOT, TableModel,
    Viewport,
};
use gridchart_rs::render::{NullRenderer, PaintStage, Primitive, RenderFrame, TextPrimitive};

#[derive(Default)]
struct CountingHost {
    requests: Cell<u64>,
}

impl RedrawHost for CountingHost {
    fn request_redraw(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

fn chart_400() -> BarChart<NullRenderer> {
    let mut y_axis =
        LinearAxis::values(Orientation::Vertical, -10.0, 10.0).expect("value axis");
    y_axis.set_reserved_span(0);
    let mut chart = BarChart::new(
        NullRenderer::default(),
        BarChartEngine::default(),
        Viewport::new(400, 300),
    )
    .with_axes(
        Some(Box::new(LinearAxis::categories())),
        Some(Box::new(y_axis)),
    );
    chart.set_bar_thickness_bounds(10, 100);
    chart.set_bar_scale(0.5);
    chart
}

fn scenario_model() -> Rc<TableModel> {
    Rc::new(
        TableModel::from_rows(vec![vec![10.0, -5.0, 0.0, 3.0], vec![2.0, 4.0, -1.0, -2.0]])
            .expect("grid"),
    )
}

fn last_frame(chart: &BarChart<NullRenderer>) -> &RenderFrame {
    chart.renderer().last_frame.as_ref().expect("frame rendered")
}

fn label<'a>(frame: &'a RenderFrame, text: &str) -> &'a TextPrimitive {
    frame
        .texts()
        .find(|primitive| primitive.text == text)
        .unwrap_or_else(|| panic!("label {text:?} not drawn"))
}

#[test]
fn drawable_rect_excludes_axis_reserved_spans() {
    let chart = chart_400();
    let drawable = chart.drawable_rect();
    assert_eq!(drawable.left, 0);
    assert_eq!(drawable.width, 400);
    assert_eq!(drawable.height, 280);

    let chart =
        BarChart::with_value_range(NullRenderer::default(), Viewport::new(440, 300), 0.0, 1.0)
            .expect("chart");
    let drawable = chart.drawable_rect();
    assert_eq!(drawable.left, 40);
    assert_eq!(drawable.width, 400);
}

#[test]
fn grouped_end_to_end_scenario_lays_out_expected_geometry() {
    let model = scenario_model();
    let mut chart = chart_400();
    chart.set_chart_mode(ChartMode::Grouped);
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let y_axis = chart.y_axis().expect("y axis");
    let zero = y_axis.value_to_pixel(0.0);
    assert_eq!(zero, 140);

    let snapshot = chart.snapshot();
    assert_eq!(snapshot.items.len(), 8);

    let first = snapshot.items[0];
    assert_eq!(first.cell, CellRef::new(0, 0));
    assert_eq!(first.rect.left, 25);
    assert_eq!(first.rect.width, 25);
    assert_eq!(first.rect.top, y_axis.value_to_pixel(10.0));
    assert_eq!(first.rect.height, zero - y_axis.value_to_pixel(10.0));

    let second = snapshot.items[1];
    assert_eq!(second.cell, CellRef::new(1, 0));
    assert_eq!(second.rect.left, 50);
    assert_eq!(second.rect.width, 25);
    assert_eq!(second.rect.height, zero - y_axis.value_to_pixel(2.0));

    // Second category starts one 100px slot later and grows down for negatives.
    let negative = snapshot.items[2];
    assert_eq!(negative.cell, CellRef::new(0, 1));
    assert_eq!(negative.rect.left, 125);
    assert_eq!(negative.rect.top, zero);
    assert_eq!(negative.rect.height, y_axis.value_to_pixel(-5.0) - zero);

    let frame = last_frame(&chart);
    let bars = frame
        .in_stage(PaintStage::Content)
        .filter(|primitive| matches!(primitive, Primitive::Rect(_)))
        .count();
    assert_eq!(bars, 8);
}

#[test]
fn paint_stages_run_in_fixed_order() {
    let model = scenario_model();
    let mut chart = chart_400();
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let frame = last_frame(&chart);
    let stages: Vec<PaintStage> = frame.commands.iter().map(|command| command.stage).collect();
    assert!(stages.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(stages.first(), Some(&PaintStage::Background));
    assert_eq!(stages.last(), Some(&PaintStage::Foreground));

    let Some(Primitive::Rect(background)) = frame.in_stage(PaintStage::Background).next() else {
        panic!("background stage must start with a fill");
    };
    assert_eq!(background.fill_color, chart.style().background);
    assert_eq!(background.width, 400.0);

    let Some(Primitive::Rect(border)) = frame.in_stage(PaintStage::Foreground).next() else {
        panic!("foreground stage must draw the border");
    };
    assert_eq!(border.width, 399.0);
    assert_eq!(border.height, 299.0);
    assert_eq!(border.border_color, chart.style().border_pen.color);
}

#[test]
fn zero_line_is_drawn_before_bars_and_ignores_opacity() {
    let mut chart = chart_400();
    chart.set_bar_opacity(0.5);
    let model = scenario_model();
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let frame = last_frame(&chart);
    let mut content = frame.in_stage(PaintStage::Content);
    let Some(Primitive::Line(zero_line)) = content.next() else {
        panic!("content must start with the zero line");
    };
    assert_eq!(zero_line.y1, 140.0);
    assert_eq!(zero_line.x1, 0.0);
    assert_eq!(zero_line.x2, 400.0);
    assert_eq!(zero_line.color, chart.style().zero_line_pen.color);

    let Some(Primitive::Rect(bar)) = content.next() else {
        panic!("bars follow the zero line");
    };
    assert!((bar.fill_color.alpha - 0.5).abs() <= 1e-9);
}

#[test]
fn missing_model_draws_no_content() {
    let mut chart = chart_400();
    chart.render().expect("render");

    let frame = last_frame(&chart);
    assert_eq!(frame.in_stage(PaintStage::Content).count(), 0);
    assert_eq!(frame.in_stage(PaintStage::Background).count(), 1);
    assert_eq!(chart.hovered_cell(), None);
}

#[test]
fn empty_grid_still_gets_zero_line_only() {
    let mut chart = chart_400();
    let model = Rc::new(TableModel::new(0, 0));
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let frame = last_frame(&chart);
    let content: Vec<&Primitive> = frame.in_stage(PaintStage::Content).collect();
    assert_eq!(content.len(), 1);
    assert!(matches!(content[0], Primitive::Line(_)));
}

#[test]
fn dropped_model_degrades_to_empty_content() {
    let mut chart = chart_400();
    let model = scenario_model();
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    drop(model);

    assert!(chart.model().is_none());
    chart.render().expect("render");
    assert_eq!(last_frame(&chart).in_stage(PaintStage::Content).count(), 0);
}

#[test]
fn model_swap_releases_previous_subscriptions() {
    let first = scenario_model();
    let second = Rc::new(TableModel::from_rows(vec![vec![1.0, 2.0]]).expect("grid"));

    let mut chart = chart_400();
    chart.bind_model(Some(first.clone() as Rc<dyn DataGrid>));
    assert_eq!(first.subscriber_count(), 6);

    chart.bind_model(Some(second.clone() as Rc<dyn DataGrid>));
    assert_eq!(first.subscriber_count(), 0);
    assert_eq!(second.subscriber_count(), 6);

    chart.render().expect("render");
    assert!(!chart.has_pending_redraw());

    first
        .set_value(CellRef::new(0, 0), 99.0)
        .expect("old model edit");
    assert!(!chart.has_pending_redraw());

    let snapshot = chart.snapshot();
    assert_eq!(snapshot.column_count, 2);
    assert_eq!(snapshot.items.len(), 2);

    second
        .set_value(CellRef::new(0, 1), 5.0)
        .expect("new model edit");
    assert!(chart.has_pending_redraw());

    drop(chart);
    assert_eq!(second.subscriber_count(), 0);
}

#[test]
fn every_change_kind_schedules_a_redraw() {
    let model = scenario_model();
    let mut chart = chart_400();
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));

    let edits: [&dyn Fn(&TableModel); 6] = [
        &|model: &TableModel| model.set_value(CellRef::new(0, 0), 1.0).expect("value"),
        &|model: &TableModel| {
            model
                .set_row_header(0, Default::default())
                .expect("header")
        },
        &|model: &TableModel| model.insert_rows(0, 1).expect("insert rows"),
        &|model: &TableModel| model.remove_rows(0, 1).expect("remove rows"),
        &|model: &TableModel| model.insert_columns(0, 1).expect("insert columns"),
        &|model: &TableModel| model.remove_columns(0, 1).expect("remove columns"),
    ];

    for edit in edits {
        chart.render().expect("render");
        assert!(!chart.has_pending_redraw());
        edit(&model);
        assert!(chart.has_pending_redraw());
    }
}

#[test]
fn rapid_changes_coalesce_into_one_layout_pass() {
    let model = scenario_model();
    let host = Rc::new(CountingHost::default());

    let mut chart = chart_400();
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.set_redraw_host(Some(Rc::clone(&host) as Rc<dyn RedrawHost>));
    assert_eq!(host.requests.get(), 1);

    assert!(chart.render_if_needed().expect("first paint"));
    assert_eq!(chart.layout_pass_count(), 1);

    for step in 0..25 {
        model
            .set_value(CellRef::new(1, 2), f64::from(step))
            .expect("edit");
    }
    chart.pointer_move(10, 10);
    chart.set_bar_scale(0.8);

    assert_eq!(host.requests.get(), 2);
    assert!(chart.render_if_needed().expect("second paint"));
    assert!(!chart.render_if_needed().expect("nothing pending"));
    assert_eq!(chart.layout_pass_count(), 2);
    assert_eq!(chart.renderer().render_count, 2);
}

#[test]
fn trend_mode_draws_polylines_under_markers() {
    let model = Rc::new(TableModel::from_rows(vec![vec![1.0, 2.0, 3.0]]).expect("grid"));
    let mut chart = chart_400();
    chart.set_chart_mode(ChartMode::Trend);
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let frame = last_frame(&chart);
    assert!(frame.antialias);

    let polylines: Vec<_> = frame.polylines().collect();
    assert_eq!(polylines.len(), 1);
    assert_eq!(polylines[0].stroke_width, 2.0);
    let xs: Vec<f64> = polylines[0].points.iter().map(|(x, _)| *x).collect();
    assert_eq!(xs, vec![66.0, 199.0, 332.0]);

    let content: Vec<&Primitive> = frame.in_stage(PaintStage::Content).collect();
    let polyline_at = content
        .iter()
        .position(|primitive| matches!(primitive, Primitive::Polyline(_)))
        .expect("polyline");
    let first_circle = content
        .iter()
        .position(|primitive| matches!(primitive, Primitive::Circle(_)))
        .expect("marker");
    assert!(polyline_at < first_circle);
    assert_eq!(frame.circles().count(), 3);
}

#[test]
fn text_format_template_wraps_values() {
    let mut chart = chart_400();
    chart.set_chart_mode(ChartMode::Grouped);
    chart.set_text_format("%1 pcs");
    let model = scenario_model();
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let labels: Vec<&str> = last_frame(&chart)
        .in_stage(PaintStage::Content)
        .filter_map(|primitive| match primitive {
            Primitive::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels.len(), 8);
    assert!(labels.contains(&"10 pcs"));
    assert!(labels.contains(&"-5 pcs"));
}

#[test]
fn zero_sized_viewport_skips_rendering() {
    let model = scenario_model();
    let mut chart = chart_400();
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.resize(Viewport::new(0, 300));
    chart.render().expect("empty render is not an error");
    assert_eq!(chart.renderer().render_count, 0);
    assert!(!chart.has_pending_redraw());
}

#[test]
fn grouped_labels_sit_above_positive_and_below_negative_bars() {
    let model = scenario_model();
    let mut chart = chart_400();
    chart.set_chart_mode(ChartMode::Grouped);
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    // 11px font: labels are 14px tall.
    let snapshot = chart.snapshot();
    let frame = last_frame(&chart);

    let positive = snapshot.items[0];
    assert_eq!(positive.value, 10.0);
    let above = label(frame, "10");
    assert_eq!(above.y, f64::from(positive.rect.top - 14));
    assert_eq!(above.x, f64::from(positive.rect.left + positive.rect.width / 2));

    let negative = snapshot.items[2];
    assert_eq!(negative.value, -5.0);
    let below = label(frame, "-5");
    assert_eq!(negative.rect.bottom(), 210);
    assert_eq!(below.y, 210.0);
}

#[test]
fn trend_labels_move_away_from_the_zero_side() {
    let model = Rc::new(TableModel::from_rows(vec![vec![4.0, -4.0]]).expect("grid"));
    let mut chart = chart_400();
    chart.set_chart_mode(ChartMode::Trend);
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let frame = last_frame(&chart);
    let points: Vec<(f64, f64)> = frame.circles().map(|circle| (circle.cx, circle.cy)).collect();
    assert_eq!(points, vec![(100.0, 84.0), (300.0, 196.0)]);

    // Centered on the point, then shifted one label height (14px) up or down.
    let above = label(frame, "4");
    assert_eq!(above.y, 84.0 - 7.0 - 14.0);
    assert!((above.x - 100.0).abs() <= 1.0);

    let below = label(frame, "-4");
    assert_eq!(below.y, 196.0 - 7.0 + 14.0);
    assert!((below.x - 300.0).abs() <= 1.0);
}

#[test]
fn zero_width_zero_line_pen_is_still_stroked() {
    let model = scenario_model();
    let mut chart = chart_400();
    let mut pen = chart.style().zero_line_pen;
    pen.width = 0.0;
    chart.set_zero_line_pen(pen).expect("pen");
    chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
    chart.render().expect("render");

    let Some(Primitive::Line(zero_line)) = last_frame(&chart).in_stage(PaintStage::Content).next()
    else {
        panic!("content must start with the zero line");
    };
    assert_eq!(zero_line.stroke_width, 1.0);
}

#[test]
fn values_far_outside_the_axis_range_render_in_every_mode() {
    for mode in [ChartMode::Stacked, ChartMode::Grouped, ChartMode::Trend] {
        for value in [1e12, -1e12] {
            let model = Rc::new(TableModel::from_rows(vec![vec![value]]).expect("grid"));
            let mut chart = chart_400();
            chart.set_chart_mode(mode);
            chart.bind_model(Some(model.clone() as Rc<dyn DataGrid>));
            chart.render().expect("render");
            chart.pointer_move(200, 139);
            chart.render().expect("render with pointer");

            let item = chart.snapshot().items[0];
            let y_axis = chart.y_axis().expect("y axis");
            let expected = if value > 0.0 {
                -PIXEL_OVERSHOOT
            } else {
                280 + PIXEL_OVERSHOOT
            };
            assert_eq!(y_axis.value_to_pixel(value), expected, "{mode:?}");
            if mode == ChartMode::Trend {
                assert_eq!(item.rect.top, expected, "{mode:?}");
                assert_eq!(chart.hovered_cell(), None);
            } else {
                let bar_end = if value > 0.0 { item.rect.top } else { item.rect.bottom() };
                assert_eq!(bar_end, expected, "{mode:?}");
                assert_eq!(item.rect.height, PIXEL_OVERSHOOT + 140, "{mode:?}");
            }
        }
    }
}
