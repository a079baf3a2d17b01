//! Horizontal carousels with arrow stepping and touch swipe.

/// Step width of the experience carousel.
pub const EXPERIENCE_STEP: f64 = 560.0;
/// Step width of the projects carousel.
pub const PROJECTS_STEP: f64 = 450.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Scroll state of one carousel.
#[derive(Debug, Clone)]
pub struct Carousel {
    step: f64,
    content_width: f64,
    viewport_width: f64,
    offset: f64,
}

impl Carousel {
    pub fn new(step: f64, content_width: f64, viewport_width: f64) -> Self {
        Self {
            step,
            content_width,
            viewport_width,
            offset: 0.0,
        }
    }

    pub fn experience(content_width: f64, viewport_width: f64) -> Self {
        Self::new(EXPERIENCE_STEP, content_width, viewport_width)
    }

    pub fn projects(content_width: f64, viewport_width: f64) -> Self {
        Self::new(PROJECTS_STEP, content_width, viewport_width)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Largest reachable scroll offset.
    pub fn max_offset(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    /// Move one step in `direction`.
    pub fn slide(&mut self, direction: Direction) -> f64 {
        self.scroll_to(self.offset + self.step * direction.sign())
    }

    /// Jump to `offset`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: f64) -> f64 {
        self.offset = offset.clamp(0.0, self.max_offset());
        self.offset
    }

    /// Track the viewport after a resize, keeping the offset in range.
    pub fn resize(&mut self, viewport_width: f64) {
        self.viewport_width = viewport_width;
        self.scroll_to(self.offset);
    }
}

/// Touch drag state for a carousel.
#[derive(Debug, Clone, Default)]
pub struct SwipeGesture {
    start_x: f64,
    start_offset: f64,
    touching: bool,
}

impl SwipeGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, carousel: &Carousel, x: f64) {
        self.touching = true;
        self.start_x = x;
        self.start_offset = carousel.offset();
    }

    /// Drag to `x`; content follows the finger. Ignored when not touching.
    pub fn move_to(&mut self, carousel: &mut Carousel, x: f64) {
        if !self.touching {
            return;
        }
        carousel.scroll_to(self.start_offset + (self.start_x - x));
    }

    pub fn end(&mut self) {
        self.touching = false;
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }
}
