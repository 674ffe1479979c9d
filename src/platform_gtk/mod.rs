use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use tracing::{debug, warn};

use crate::api::{ChartContent, ChartSurface, RedrawHost};
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::interaction::PointerButton;
use crate::render::{CairoContextRenderer, Renderer};

/// Redraw host that forwards to `queue_draw` while the drawing area is alive.
struct QueueDrawHost {
    area: gtk::glib::WeakRef<gtk::DrawingArea>,
}

impl RedrawHost for QueueDrawHost {
    fn request_redraw(&self) {
        if let Some(area) = self.area.upgrade() {
            area.queue_draw();
        }
    }
}

/// Embeds a chart surface in a GTK4 `DrawingArea`.
///
/// Draw callbacks paint through the cairo backend; size changes feed `resize`;
/// every redraw the surface schedules becomes a `queue_draw`.
pub struct GtkChartAdapter<R, C>
where
    R: Renderer + CairoContextRenderer + 'static,
    C: ChartContent + 'static,
{
    drawing_area: gtk::DrawingArea,
    chart: Rc<RefCell<ChartSurface<R, C>>>,
}

impl<R, C> GtkChartAdapter<R, C>
where
    R: Renderer + CairoContextRenderer + 'static,
    C: ChartContent + 'static,
{
    #[must_use]
    pub fn new(chart: ChartSurface<R, C>) -> Self {
        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_hexpand(true);
        drawing_area.set_vexpand(true);

        let chart = Rc::new(RefCell::new(chart));
        chart
            .borrow_mut()
            .set_redraw_host(Some(Rc::new(QueueDrawHost {
                area: drawing_area.downgrade(),
            })));

        drawing_area.set_draw_func({
            let chart = Rc::clone(&chart);
            move |_widget, context, width, height| {
                if width <= 0 || height <= 0 {
                    return;
                }
                let Ok(mut chart) = chart.try_borrow_mut() else {
                    return;
                };
                if let Err(err) = chart.render_on_cairo_context(context) {
                    warn!(%err, "chart render failed");
                }
            }
        });

        drawing_area.connect_resize({
            let chart = Rc::clone(&chart);
            move |_widget, width, height| {
                let Ok(mut chart) = chart.try_borrow_mut() else {
                    return;
                };
                let viewport = Viewport::new(
                    u32::try_from(width).unwrap_or(0),
                    u32::try_from(height).unwrap_or(0),
                );
                if chart.viewport() != viewport {
                    chart.resize(viewport);
                }
            }
        });

        Self {
            drawing_area,
            chart,
        }
    }

    #[must_use]
    pub fn drawing_area(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    #[must_use]
    pub fn chart(&self) -> Rc<RefCell<ChartSurface<R, C>>> {
        Rc::clone(&self.chart)
    }

    /// Runs `update` against the chart; redraws it schedules reach GTK automatically.
    pub fn update_chart<T>(
        &self,
        update: impl FnOnce(&mut ChartSurface<R, C>) -> ChartResult<T>,
    ) -> ChartResult<T> {
        let mut chart = self
            .chart
            .try_borrow_mut()
            .map_err(|_| ChartError::InvalidData("chart is already borrowed".to_owned()))?;
        update(&mut chart)
    }

    /// Wires pointer motion, leave, press, release, and double click into the surface.
    pub fn install_default_interaction(&self) {
        let motion = gtk::EventControllerMotion::new();
        {
            let chart = Rc::clone(&self.chart);
            motion.connect_motion(move |_, x, y| {
                if let Ok(mut chart) = chart.try_borrow_mut() {
                    chart.pointer_move(x.floor() as i32, y.floor() as i32);
                }
            });
        }
        {
            let chart = Rc::clone(&self.chart);
            motion.connect_leave(move |_| {
                if let Ok(mut chart) = chart.try_borrow_mut() {
                    chart.pointer_leave();
                }
            });
        }
        self.drawing_area.add_controller(motion);

        let click = gtk::GestureClick::new();
        click.set_button(0);
        {
            let chart = Rc::clone(&self.chart);
            click.connect_pressed(move |gesture, n_press, _x, _y| {
                let Some(button) = map_button(gesture.current_button()) else {
                    return;
                };
                let Ok(mut chart) = chart.try_borrow_mut() else {
                    return;
                };
                if n_press == 2 {
                    chart.pointer_double_click(button);
                } else {
                    chart.pointer_press(button);
                }
            });
        }
        {
            let chart = Rc::clone(&self.chart);
            click.connect_released(move |gesture, _n_press, _x, _y| {
                let Some(button) = map_button(gesture.current_button()) else {
                    return;
                };
                if let Ok(mut chart) = chart.try_borrow_mut() {
                    chart.pointer_release(button);
                }
            });
        }
        self.drawing_area.add_controller(click);
        debug!("installed default chart interaction controllers");
    }
}

fn map_button(button: u32) -> Option<PointerButton> {
    match button {
        1 => Some(PointerButton::Primary),
        2 => Some(PointerButton::Middle),
        3 => Some(PointerButton::Secondary),
        _ => None,
    }
}
