use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::{Snapshot, Termination};

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::styled(
            "PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("Press Space to Continue"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over (or grid-filled) screen as a centered popup.
///
/// `reference_high_score` is the record from before this game, so a score
/// that was just persisted still counts as new.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    reference_high_score: u32,
) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let won = snapshot.termination == Some(Termination::GridFilled);
    let (headline, color) = if won {
        ("YOU WIN", Color::Green)
    } else {
        ("GAME OVER", Color::Red)
    };
    let is_new_high = snapshot.score > reference_high_score;

    let lines = vec![
        Line::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Final Score: {}", snapshot.score)),
        Line::from(format!("Snake Length: {}", snapshot.length)),
        Line::from(termination_text(snapshot.termination)),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::styled("Press R to Restart", Style::default().fg(Color::Yellow)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

/// One-line cause shown on the game-over popup.
#[must_use]
pub fn termination_text(termination: Option<Termination>) -> &'static str {
    match termination {
        Some(Termination::Wall) => "Cause: hit wall",
        Some(Termination::SelfCollision) => "Cause: hit yourself",
        Some(Termination::GridFilled) => "The snake fills the board",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
