use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{
    CellRef, CoordinateAxis, DataGrid, GridChange, GridChangeKind, GridListener, PixelPoint,
    PixelRect, SubscriptionId, Viewport,
};
use crate::error::ChartResult;
use crate::interaction::{ChartEvent, ChartListener, Highlight, PointerState};
use crate::render::{Color, PaintStage, RectPrimitive, RenderFrame, Renderer};

use super::{ChartStyle, RedrawHost, RedrawScheduler};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Everything one paint stage may read, plus the frame it writes into.
pub struct PaintContext<'a> {
    pub frame: &'a mut RenderFrame,
    pub grid: Option<&'a dyn DataGrid>,
    pub x_axis: Option<&'a dyn CoordinateAxis>,
    pub y_axis: Option<&'a dyn CoordinateAxis>,
    pub style: &'a ChartStyle,
    pub pointer: Option<PixelPoint>,
    pub bounds: PixelRect,
    pub drawable: PixelRect,
}

/// Content drawn by a surface; each paint stage can be replaced independently.
pub trait ChartContent {
    /// Draws data content and returns the single item under the pointer, if any.
    fn draw_content(&self, ctx: &mut PaintContext<'_>) -> Option<Highlight>;

    fn draw_background(&self, ctx: &mut PaintContext<'_>) {
        fill_background(ctx);
    }

    fn draw_axes(&self, ctx: &mut PaintContext<'_>) {
        draw_axes(ctx);
    }

    fn draw_foreground(&self, ctx: &mut PaintContext<'_>) {
        draw_border(ctx);
    }

    fn wants_antialias(&self) -> bool {
        false
    }
}

/// Fills the full widget bounds with the background color.
pub fn fill_background(ctx: &mut PaintContext<'_>) {
    let bounds = ctx.bounds;
    ctx.frame.push_rect(RectPrimitive::new(
        f64::from(bounds.left),
        f64::from(bounds.top),
        f64::from(bounds.width),
        f64::from(bounds.height),
        ctx.style.background,
    ));
}

pub fn draw_axes(ctx: &mut PaintContext<'_>) {
    for axis in [ctx.x_axis, ctx.y_axis].into_iter().flatten() {
        axis.draw(ctx.frame);
    }
}

/// Strokes a frame just inside the widget bounds.
pub fn draw_border(ctx: &mut PaintContext<'_>) {
    let pen = ctx.style.border_pen;
    if ctx.bounds.is_empty() {
        return;
    }
    let bounds = ctx.bounds;
    ctx.frame.push_rect(
        RectPrimitive::new(
            f64::from(bounds.left),
            f64::from(bounds.top),
            f64::from(bounds.width - 1),
            f64::from(bounds.height - 1),
            Color::TRANSPARENT,
        )
        .with_border(pen),
    );
}

/// Chart widget core: model binding, axes, paint pipeline, and pointer plumbing.
///
/// The surface never paints from inside a notification. Model changes, pointer
/// moves, and setters only mark it dirty; the host calls `render` (or
/// `render_if_needed`) once per frame, and that single pass does layout and
/// hit-testing.
pub struct ChartSurface<R: Renderer, C: ChartContent> {
    pub(super) renderer: R,
    pub(super) content: C,
    pub(super) viewport: Viewport,
    pub(super) x_axis: Option<Box<dyn CoordinateAxis>>,
    pub(super) y_axis: Option<Box<dyn CoordinateAxis>>,
    pub(super) model: Option<Weak<dyn DataGrid>>,
    pub(super) model_subscriptions: SmallVec<[SubscriptionId; 6]>,
    pub(super) style: ChartStyle,
    pub(super) antialiasing: bool,
    pub(super) pointer: PointerState,
    pub(super) scheduler: Rc<RedrawScheduler>,
    pub(super) listeners: Vec<Box<dyn ChartListener>>,
    pub(super) layout_passes: u64,
}

impl<R: Renderer, C: ChartContent> ChartSurface<R, C> {
    #[must_use]
    pub fn new(renderer: R, content: C, viewport: Viewport) -> Self {
        Self {
            renderer,
            content,
            viewport,
            x_axis: None,
            y_axis: None,
            model: None,
            model_subscriptions: SmallVec::new(),
            style: ChartStyle::default(),
            antialiasing: false,
            pointer: PointerState::default(),
            scheduler: Rc::new(RedrawScheduler::default()),
            listeners: Vec::new(),
            layout_passes: 0,
        }
    }

    #[must_use]
    pub fn with_axes(
        mut self,
        x_axis: Option<Box<dyn CoordinateAxis>>,
        y_axis: Option<Box<dyn CoordinateAxis>>,
    ) -> Self {
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn x_axis(&self) -> Option<&dyn CoordinateAxis> {
        self.x_axis.as_deref()
    }

    #[must_use]
    pub fn y_axis(&self) -> Option<&dyn CoordinateAxis> {
        self.y_axis.as_deref()
    }

    pub fn set_x_axis(&mut self, axis: Option<Box<dyn CoordinateAxis>>) {
        self.x_axis = axis;
        self.scheduler.schedule();
    }

    pub fn set_y_axis(&mut self, axis: Option<Box<dyn CoordinateAxis>>) {
        self.y_axis = axis;
        self.scheduler.schedule();
    }

    /// Currently bound grid, if it is still alive.
    #[must_use]
    pub fn model(&self) -> Option<Rc<dyn DataGrid>> {
        self.model.as_ref().and_then(Weak::upgrade)
    }

    /// Binds a new grid (or none), releasing every subscription on the previous one.
    ///
    /// The surface keeps only a weak reference; the application owns the grid.
    pub fn bind_model(&mut self, grid: Option<Rc<dyn DataGrid>>) {
        self.release_model_subscriptions();

        for axis in [self.x_axis.as_deref_mut(), self.y_axis.as_deref_mut()]
            .into_iter()
            .flatten()
        {
            axis.sync_model(grid.as_deref());
        }

        if let Some(grid) = grid.as_deref() {
            let scheduler = Rc::downgrade(&self.scheduler);
            let listener: GridListener = Rc::new(move |change: GridChange| {
                if let Some(scheduler) = scheduler.upgrade() {
                    trace!(?change, "grid change scheduled a redraw");
                    scheduler.schedule();
                }
            });
            for kind in GridChangeKind::ALL {
                self.model_subscriptions
                    .push(grid.subscribe(kind, Rc::clone(&listener)));
            }
        }

        debug!(
            bound = grid.is_some(),
            subscriptions = self.model_subscriptions.len(),
            "bound chart model"
        );
        self.model = grid.as_ref().map(Rc::downgrade);
        self.pointer.reset();
        self.scheduler.schedule();
    }

    fn release_model_subscriptions(&mut self) {
        let previous = self.model();
        let released = self.model_subscriptions.len();
        for id in self.model_subscriptions.drain(..) {
            if let Some(previous) = previous.as_deref() {
                previous.unsubscribe(id);
            }
        }
        if released > 0 {
            debug!(released, "released previous model subscriptions");
        }
        self.model = None;
    }

    /// Widget bounds minus the span each present axis reserves for its decorations.
    #[must_use]
    pub fn drawable_rect(&self) -> PixelRect {
        let bounds = self.viewport.bounds();
        let bottom_reserve = self.x_axis.as_deref().map_or(0, |axis| axis.reserved_span());
        let left_reserve = self.y_axis.as_deref().map_or(0, |axis| axis.reserved_span());
        PixelRect::new(
            bounds.left + left_reserve.min(bounds.width),
            bounds.top,
            (bounds.width - left_reserve).max(0),
            (bounds.height - bottom_reserve).max(0),
        )
    }

    #[must_use]
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    #[must_use]
    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    #[must_use]
    pub fn hovered_cell(&self) -> Option<CellRef> {
        self.pointer.hovered_cell()
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Number of layout + hit-test passes run so far.
    #[must_use]
    pub fn layout_pass_count(&self) -> u64 {
        self.layout_passes
    }

    #[must_use]
    pub fn redraw_request_count(&self) -> u64 {
        self.scheduler.request_count()
    }

    pub fn set_redraw_host(&mut self, host: Option<Rc<dyn RedrawHost>>) {
        self.scheduler.set_host(host);
    }

    /// Marks the surface dirty and asks the host for a deferred repaint.
    pub fn schedule_update(&mut self) {
        self.scheduler.schedule();
    }

    /// Updates hover state and emits `Entered` when the hovered cell changes.
    pub fn set_index_under_mouse(&mut self, hovered: Option<Highlight>) {
        if self.pointer.set_hovered(hovered) {
            let cell = hovered.map(|highlight| highlight.cell);
            debug!(?cell, "hovered cell changed");
            self.emit_event(ChartEvent::Entered(cell));
        }
    }

    /// Runs one full paint pass and returns the materialized frame.
    ///
    /// Stage order is fixed: background, axes, content, foreground. Hover
    /// state is recomputed from scratch by the content stage.
    pub fn build_frame(&mut self) -> RenderFrame {
        self.layout_passes += 1;
        let grid = self.model();
        let drawable = self.drawable_rect();
        for axis in [self.x_axis.as_deref_mut(), self.y_axis.as_deref_mut()]
            .into_iter()
            .flatten()
        {
            axis.sync_model(grid.as_deref());
            axis.set_area(drawable);
        }

        let mut frame = RenderFrame::new(self.viewport);
        frame.antialias = self.antialiasing || self.content.wants_antialias();

        let hovered = {
            let mut ctx = PaintContext {
                frame: &mut frame,
                grid: grid.as_deref(),
                x_axis: self.x_axis.as_deref(),
                y_axis: self.y_axis.as_deref(),
                style: &self.style,
                pointer: self.pointer.position(),
                bounds: self.viewport.bounds(),
                drawable,
            };

            ctx.frame.begin_stage(PaintStage::Background);
            self.content.draw_background(&mut ctx);
            ctx.frame.begin_stage(PaintStage::Axes);
            self.content.draw_axes(&mut ctx);
            ctx.frame.begin_stage(PaintStage::Content);
            let hovered = self.content.draw_content(&mut ctx);
            ctx.frame.begin_stage(PaintStage::Foreground);
            self.content.draw_foreground(&mut ctx);
            hovered
        };

        self.set_index_under_mouse(hovered);
        self.scheduler.mark_painted();
        trace!(
            pass = self.layout_passes,
            commands = frame.commands.len(),
            "paint pass complete"
        );
        frame
    }

    pub fn render(&mut self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            debug!(
                width = self.viewport.width,
                height = self.viewport.height,
                "skipping render for empty viewport"
            );
            self.scheduler.mark_painted();
            return Ok(());
        }
        let frame = self.build_frame();
        self.renderer.render(&frame)
    }

    /// Renders only when something marked the surface dirty since the last paint.
    pub fn render_if_needed(&mut self) -> ChartResult<bool> {
        if !self.scheduler.is_dirty() {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Renders the frame into an external cairo context (GTK draw callbacks).
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        if !self.viewport.is_valid() {
            self.scheduler.mark_painted();
            return Ok(());
        }
        let frame = self.build_frame();
        self.renderer.render_on_cairo_context(context, &frame)
    }
}

impl<R: Renderer, C: ChartContent> Drop for ChartSurface<R, C> {
    fn drop(&mut self) {
        self.release_model_subscriptions();
    }
}
