use serde::{Deserialize, Serialize};

/// Fixed paint pipeline stage; every draw command is tagged with the stage that emitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaintStage {
    Background,
    Axes,
    Content,
    Foreground,
}

impl PaintStage {
    /// Canonical back-to-front order of one paint pass.
    pub const ORDER: [PaintStage; 4] = [
        PaintStage::Background,
        PaintStage::Axes,
        PaintStage::Content,
        PaintStage::Foreground,
    ];
}

#[cfg(test)]
mod tests {
    use super::PaintStage;

    #[test]
    fn canonical_order_matches_ord() {
        let mut sorted = PaintStage::ORDER;
        sorted.sort();
        assert_eq!(sorted, PaintStage::ORDER);
    }
}
