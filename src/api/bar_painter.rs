use crate::core::{LayoutItem, TrendSeries};
use crate::interaction::Highlight;
use crate::render::PolylinePrimitive;

use super::{BarChartEngine, PaintContext};

const TREND_LINE_WIDTH_PX: f64 = 2.0;

/// Paints bar items in layout order; the first item under the pointer is held
/// back and painted last with the highlight style.
pub(super) fn paint_bars(
    engine: &BarChartEngine,
    ctx: &mut PaintContext<'_>,
    items: &[LayoutItem],
) -> Option<Highlight> {
    let mut highlighted: Option<&LayoutItem> = None;
    for item in items {
        if highlighted.is_none() && item.hit(ctx.pointer) {
            highlighted = Some(item);
            continue;
        }
        engine.draw_segment(ctx, item, false);
        engine.draw_value(ctx, item, false);
    }

    let item = highlighted?;
    engine.draw_segment(ctx, item, true);
    engine.draw_value(ctx, item, true);
    Some(highlight_of(item))
}

/// Paints each row as a polyline with markers and labels on top, then the
/// highlighted point last.
pub(super) fn paint_trend(
    engine: &BarChartEngine,
    ctx: &mut PaintContext<'_>,
    series: &[TrendSeries],
) -> Option<Highlight> {
    let opacity = engine.opacity();
    let highlighted = series
        .iter()
        .flat_map(|row| row.points.iter())
        .find(|item| item.hit(ctx.pointer));

    for row in series {
        if row.points.is_empty() {
            continue;
        }
        let color = ctx
            .grid
            .map(|grid| grid.row_header(row.row))
            .unwrap_or_default()
            .background;
        let points = row
            .points
            .iter()
            .map(|item| {
                let at = item.rect.top_left();
                (f64::from(at.x), f64::from(at.y))
            })
            .collect();
        ctx.frame.push_polyline(PolylinePrimitive::new(
            points,
            TREND_LINE_WIDTH_PX,
            color.faded(opacity),
        ));

        for item in &row.points {
            if highlighted.is_some_and(|hit| hit.cell == item.cell) {
                continue;
            }
            engine.draw_segment(ctx, item, false);
            engine.draw_value(ctx, item, false);
        }
    }

    let item = highlighted?;
    engine.draw_segment(ctx, item, true);
    engine.draw_value(ctx, item, true);
    Some(highlight_of(item))
}

fn highlight_of(item: &LayoutItem) -> Highlight {
    Highlight {
        cell: item.cell,
        rect: item.rect,
        value: item.value,
    }
}
