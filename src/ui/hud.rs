use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::Snapshot;

/// Controls reminder shown under the score line.
pub const CONTROLS_HINT: &str = "Arrows/WASD: Move | Space: Pause | R: Restart | Q: Quit";

/// Host-side values the HUD shows next to the snapshot.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HudInfo {
    /// Best score persisted across runs.
    pub high_score: u32,
    /// Best score as it stood when the current game started.
    pub game_over_reference_high_score: u32,
    /// Shows best score and tick interval (advanced variant).
    pub advanced: bool,
}

/// Text of the score row.
#[must_use]
pub fn score_text(snapshot: &Snapshot, info: HudInfo) -> String {
    let mut text = format!("Score: {} | Length: {}", snapshot.score, snapshot.length);
    if info.advanced {
        let best = info.high_score.max(snapshot.best_score);
        text.push_str(&format!(
            " | High Score: {best} | Speed: {}ms",
            snapshot.tick_interval_ms
        ));
    }
    text
}

/// Draws the score row and the controls row.
pub fn render_hud(
    frame: &mut Frame<'_>,
    score_area: Rect,
    controls_area: Rect,
    snapshot: &Snapshot,
    info: HudInfo,
) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            score_text(snapshot, info),
            Style::default().fg(Color::White),
        )))
        .alignment(Alignment::Center),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(Line::from(CONTROLS_HINT))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow)),
        controls_area,
    );
}
