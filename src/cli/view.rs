//! Terminal rendering of directory results and portfolio frames.

use std::io::Write;

use crate::directory::DonorCard;
use crate::models::SearchOutcome;
use crate::portfolio::{ParticleFrame, Render};

/// Text shown when storage holds no donors at all.
pub const NO_DATA_NOTICE: &str = "No donors registered yet.";
/// Text shown when donors exist but the filters exclude all of them.
pub const NO_MATCHES_NOTICE: &str = "No donors found.";

/// Cards for every donor in the outcome, in display order.
pub fn cards(outcome: &SearchOutcome, country_code: &str) -> Vec<DonorCard> {
    outcome
        .donors()
        .iter()
        .map(|donor| DonorCard::new(donor, country_code))
        .collect()
}

pub fn render_card(card: &DonorCard) -> String {
    let mut out = String::new();
    out.push_str(&format!("#{}  {}  [{}]\n", card.id, card.name, card.blood_group));
    out.push_str(&format!("    {}\n", card.place));
    out.push_str(&format!("    {}\n", card.distance));
    out.push_str(&format!("    {}\n", card.status));
    out.push_str(&format!("    Call:     {}\n", card.links.call));
    out.push_str(&format!("    WhatsApp: {}\n", card.links.whatsapp));
    if let Some(map) = &card.links.map {
        out.push_str(&format!("    Map:      {}\n", map));
    }
    out
}

/// Full results view for a search outcome.
pub fn render_outcome(outcome: &SearchOutcome, country_code: &str) -> String {
    match outcome {
        SearchOutcome::NoData => format!("{NO_DATA_NOTICE}\n"),
        SearchOutcome::NoMatches => format!("{NO_MATCHES_NOTICE}\n"),
        SearchOutcome::Results(_) => cards(outcome, country_code)
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Rasterize particles onto a character grid of `cols` x `rows`.
pub fn render_particles(frame: &ParticleFrame, cols: usize, rows: usize) -> String {
    let mut grid = vec![vec![' '; cols]; rows];
    if cols > 0 && rows > 0 && frame.width > 0.0 && frame.height > 0.0 {
        for p in &frame.particles {
            let col = (p.x / frame.width * cols as f64).floor();
            let row = (p.y / frame.height * rows as f64).floor();
            if col < 0.0 || row < 0.0 {
                continue;
            }
            let (col, row) = (col as usize, row as usize);
            if col < cols && row < rows {
                grid[row][col] = if p.r >= 2.0 { 'o' } else { '.' };
            }
        }
    }
    grid.into_iter()
        .map(|line| line.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Redraws the typing animation in place on one terminal line.
pub struct LineRenderer<W: Write> {
    out: W,
}

impl<W: Write> LineRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render<String> for LineRenderer<W> {
    fn render(&mut self, frame: &String) {
        // Terminal write failures only lose a frame
        let _ = write!(self.out, "\r{frame}");
        let _ = self.out.flush();
    }
}

/// Draws particle frames as character grids.
pub struct GridRenderer<W: Write> {
    out: W,
    cols: usize,
    rows: usize,
}

impl<W: Write> GridRenderer<W> {
    pub fn new(out: W, cols: usize, rows: usize) -> Self {
        Self { out, cols, rows }
    }
}

impl<W: Write> Render<ParticleFrame> for GridRenderer<W> {
    fn render(&mut self, frame: &ParticleFrame) {
        let _ = writeln!(
            self.out,
            "{}\n{}",
            render_particles(frame, self.cols, self.rows),
            "-".repeat(self.cols)
        );
        let _ = self.out.flush();
    }
}
