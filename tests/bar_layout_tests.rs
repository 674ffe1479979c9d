use approx::assert_abs_diff_eq;
use gridchart_rs::core::{
    CellRef, CoordinateAxis, LinearAxis, Orientation, PixelPoint, PixelRect, SlotLayout,
    TableModel, grouped_bar_width, project_grouped, project_stacked, project_trend,
    resolve_bar_thickness, slot_width,
};

fn value_axis() -> LinearAxis {
    let mut axis = LinearAxis::values(Orientation::Vertical, -10.0, 10.0).expect("value axis");
    axis.set_area(PixelRect::new(0, 0, 400, 280));
    axis
}

fn single_column(values: &[f64]) -> TableModel {
    TableModel::from_rows(values.iter().map(|value| vec![*value]).collect()).expect("grid")
}

#[test]
fn stacked_accumulators_split_by_sign() {
    let grid = single_column(&[5.0, -3.0, 2.0, -1.0]);
    let axis = value_axis();
    let slots = SlotLayout {
        categories: 1,
        rows: 4,
        span_start: 0,
        slot_width: 400,
        bar_thickness: 200,
    };

    let layout = project_stacked(&grid, &axis, slots);
    assert_eq!(layout.items.len(), 4);
    assert_abs_diff_eq!(layout.totals[0].positive, 7.0);
    assert_abs_diff_eq!(layout.totals[0].negative, -4.0);

    let zero = axis.value_to_pixel(0.0);
    let positive_height: i32 = layout
        .items
        .iter()
        .filter(|item| item.value >= 0.0)
        .map(|item| item.rect.height)
        .sum();
    let negative_height: i32 = layout
        .items
        .iter()
        .filter(|item| item.value < 0.0)
        .map(|item| item.rect.height)
        .sum();
    assert_eq!(positive_height, (zero - axis.value_to_pixel(7.0)).abs());
    assert_eq!(negative_height, (zero - axis.value_to_pixel(-4.0)).abs());
}

#[test]
fn stacked_segments_are_contiguous_per_sign() {
    let grid = single_column(&[5.0, -3.0, 2.0, -1.0]);
    let axis = value_axis();
    let slots = SlotLayout {
        categories: 1,
        rows: 4,
        span_start: 0,
        slot_width: 400,
        bar_thickness: 100,
    };
    let items = project_stacked(&grid, &axis, slots).items;

    let zero = axis.value_to_pixel(0.0);
    assert_eq!(items[0].rect.bottom(), zero);
    assert_eq!(items[2].rect.bottom(), items[0].rect.top);
    assert_eq!(items[1].rect.top, zero);
    assert_eq!(items[3].rect.top, items[1].rect.bottom());
    assert!(items.iter().all(|item| item.rect.left == 150 && item.rect.width == 100));
}

#[test]
fn grouped_degenerate_width_draws_nothing() {
    let grid = TableModel::new(4, 3);
    let axis = value_axis();
    let slots = SlotLayout {
        categories: 3,
        rows: 4,
        span_start: 0,
        slot_width: 133,
        bar_thickness: 3,
    };
    assert_eq!(grouped_bar_width(slots), 0);
    assert!(project_grouped(&grid, &axis, slots).is_empty());
}

#[test]
fn grouped_bars_sit_side_by_side_from_zero() {
    let grid = TableModel::from_rows(vec![vec![10.0, -5.0], vec![2.0, 4.0]]).expect("grid");
    let axis = value_axis();
    let slots = SlotLayout {
        categories: 2,
        rows: 2,
        span_start: 0,
        slot_width: 200,
        bar_thickness: 100,
    };

    let items = project_grouped(&grid, &axis, slots);
    let lefts: Vec<i32> = items.iter().map(|item| item.rect.left).collect();
    assert_eq!(lefts, vec![50, 100, 250, 300]);

    let zero = axis.value_to_pixel(0.0);
    assert_eq!(items[0].rect.bottom(), zero);
    assert_eq!(items[2].cell, CellRef::new(0, 1));
    assert_eq!(items[2].rect.top, zero);
    assert_eq!(items[2].rect.bottom(), axis.value_to_pixel(-5.0));
}

#[test]
fn trend_points_sit_on_slot_centers_with_square_hit_area() {
    let grid = TableModel::from_rows(vec![vec![1.0, 2.0, 3.0], vec![-1.0, 0.0, 1.0]])
        .expect("grid");
    let axis = value_axis();
    let slots = SlotLayout {
        categories: 3,
        rows: 2,
        span_start: 0,
        slot_width: 133,
        bar_thickness: 66,
    };

    let series = project_trend(&grid, &axis, slots);
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].row, 1);

    let point = series[0].points[1];
    assert_eq!(point.rect, PixelRect::new(199, axis.value_to_pixel(2.0), 1, 1));
    assert!(point.hit(Some(PixelPoint::new(196, point.rect.top - 3))));
    assert!(point.hit(Some(PixelPoint::new(202, point.rect.top + 3))));
    assert!(!point.hit(Some(PixelPoint::new(203, point.rect.top))));
    assert!(!point.hit(None));
}

#[test]
fn thickness_respects_slot_and_bounds() {
    let slot = slot_width(0, 400, 4);
    assert_eq!(slot, 100);
    assert_eq!(resolve_bar_thickness(slot, 0.5, 10, 100), 50);
    assert_eq!(resolve_bar_thickness(slot, 1.0, 10, 60), 60);
    assert_eq!(resolve_bar_thickness(slot, 0.1, 20, 100), 20);
    // Bounds never force a bar wider than its slot.
    assert_eq!(resolve_bar_thickness(slot, 0.1, 150, 200), 100);
}

#[test]
fn non_finite_cells_are_laid_out_as_zero() {
    let grid = single_column(&[f64::NAN, f64::INFINITY]);
    let axis = value_axis();
    let slots = SlotLayout {
        categories: 1,
        rows: 2,
        span_start: 0,
        slot_width: 400,
        bar_thickness: 100,
    };
    let layout = project_stacked(&grid, &axis, slots);
    assert!(layout.items.iter().all(|item| item.rect.height == 0));
    assert_abs_diff_eq!(layout.totals[0].positive, 0.0);
}
