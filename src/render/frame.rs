use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, LinePrimitive, PaintStage, PolylinePrimitive, RectPrimitive, TextPrimitive,
};

/// One drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Polyline(PolylinePrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Circle(circle) => circle.validate(),
            Self::Polyline(polyline) => polyline.validate(),
            Self::Text(text) => text.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub stage: PaintStage,
    pub primitive: Primitive,
}

/// Backend-agnostic scene for one chart paint pass.
///
/// Commands are kept in emission order; backends must paint them in that
/// order so later commands (the highlighted item) land on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub antialias: bool,
    pub commands: Vec<DrawCommand>,
    stage: PaintStage,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            antialias: false,
            commands: Vec::new(),
            stage: PaintStage::Background,
        }
    }

    /// Switches the stage that subsequent pushes are tagged with.
    pub fn begin_stage(&mut self, stage: PaintStage) {
        self.stage = stage;
    }

    #[must_use]
    pub fn stage(&self) -> PaintStage {
        self.stage
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.commands.push(DrawCommand {
            stage: self.stage,
            primitive,
        });
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.push(Primitive::Line(line));
    }

    pub fn push_rect(&mut self, rect: RectPrimitive) {
        self.push(Primitive::Rect(rect));
    }

    pub fn push_circle(&mut self, circle: CirclePrimitive) {
        self.push(Primitive::Circle(circle));
    }

    pub fn push_polyline(&mut self, polyline: PolylinePrimitive) {
        self.push(Primitive::Polyline(polyline));
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.push(Primitive::Text(text));
    }

    pub fn in_stage(&self, stage: PaintStage) -> impl Iterator<Item = &Primitive> {
        self.commands
            .iter()
            .filter(move |command| command.stage == stage)
            .map(|command| &command.primitive)
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.commands.iter().filter_map(|command| match &command.primitive {
            Primitive::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.commands.iter().filter_map(|command| match &command.primitive {
            Primitive::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> {
        self.commands.iter().filter_map(|command| match &command.primitive {
            Primitive::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &PolylinePrimitive> {
        self.commands.iter().filter_map(|command| match &command.primitive {
            Primitive::Polyline(polyline) => Some(polyline),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match &command.primitive {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for command in &self.commands {
            command.primitive.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Viewport;
    use crate::render::{Color, LinePrimitive, PaintStage, RectPrimitive};

    #[test]
    fn pushes_are_tagged_with_current_stage_in_order() {
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        let color = Color::rgb(0.1, 0.1, 0.1);
        frame.push_rect(RectPrimitive::new(0.0, 0.0, 100.0, 100.0, color));
        frame.begin_stage(PaintStage::Content);
        frame.push_line(LinePrimitive::new(0.0, 50.0, 100.0, 50.0, 1.0, color));

        assert_eq!(frame.commands[0].stage, PaintStage::Background);
        assert_eq!(frame.commands[1].stage, PaintStage::Content);
        assert_eq!(frame.in_stage(PaintStage::Content).count(), 1);
        assert_eq!(frame.rects().count(), 1);
    }

    #[test]
    fn validate_rejects_zero_viewport() {
        let frame = RenderFrame::new(Viewport::new(0, 10));
        assert!(frame.validate().is_err());
    }
}
