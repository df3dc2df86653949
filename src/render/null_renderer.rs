use crate::error::ChartResult;
use crate::render::{RenderFrame, RenderMode, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content and records what it was asked to draw.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_mode: Option<RenderMode>,
    pub last_primitive_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.render_count += 1;
        self.last_mode = Some(frame.mode);
        self.last_primitive_count = frame.primitive_count();
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
