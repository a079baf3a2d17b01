//! Reveal-on-scroll tracking and skill-bar progress.

use std::collections::HashSet;

/// Visible ratio at which page sections are revealed.
pub const SECTION_THRESHOLD: f64 = 0.15;
/// Visible ratio at which skill groups start their bars.
pub const SKILLS_THRESHOLD: f64 = 0.25;

/// Remembers which elements have been scrolled into view.
///
/// Reveals are sticky: an element that scrolls back out stays revealed.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    threshold: f64,
    revealed: HashSet<String>,
}

impl RevealTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            revealed: HashSet::new(),
        }
    }

    pub fn sections() -> Self {
        Self::new(SECTION_THRESHOLD)
    }

    /// Report the visible ratio of `id`. Returns true the first time it is revealed.
    pub fn observe(&mut self, id: &str, visible_ratio: f64) -> bool {
        if visible_ratio < self.threshold || self.revealed.contains(id) {
            return false;
        }
        self.revealed.insert(id.to_string())
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }
}

/// One skill bar with its target level in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillBar {
    pub name: String,
    level: u8,
}

impl SkillBar {
    /// Levels above 100 are clamped.
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level: level.min(100),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

/// A group of skill bars that fill once the group becomes visible.
#[derive(Debug, Clone)]
pub struct SkillBars {
    bars: Vec<SkillBar>,
    filled: bool,
}

impl SkillBars {
    pub fn new(bars: Vec<SkillBar>) -> Self {
        Self {
            bars,
            filled: false,
        }
    }

    /// Report the group's visible ratio; the bars fill at the skills threshold.
    pub fn observe(&mut self, visible_ratio: f64) {
        if visible_ratio >= SKILLS_THRESHOLD {
            self.filled = true;
        }
    }

    /// Current width of every bar in percent.
    pub fn widths(&self) -> Vec<(&str, u8)> {
        self.bars
            .iter()
            .map(|bar| (bar.name.as_str(), if self.filled { bar.level } else { 0 }))
            .collect()
    }
}
