use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::GridSize;
use crate::game::{GameStatus, Snapshot};
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu};

/// Terminal columns per grid cell; two keeps cells roughly square.
pub const CELL_COLUMNS: u16 = 2;

const GLYPH_SNAKE_HEAD: &str = "██";
const GLYPH_SNAKE_BODY: &str = "▓▓";
const GLYPH_FOOD: &str = "()";

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, hud_info: HudInfo) {
    let [board_area, score_area, controls_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let play_area = board_rect(board_area, snapshot.grid);
    let block = Block::bordered()
        .title(" Snake ")
        .border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);
    render_hud(frame, score_area, controls_area, snapshot, hud_info);

    match snapshot.status {
        GameStatus::Paused => render_pause_menu(frame, play_area),
        GameStatus::Terminated => {
            render_game_over_menu(
                frame,
                play_area,
                snapshot,
                hud_info.game_over_reference_high_score,
            );
        }
        GameStatus::Running => {}
    }
}

/// Bordered board rectangle sized for `grid`, centered and clipped to `area`.
#[must_use]
pub fn board_rect(area: Rect, grid: GridSize) -> Rect {
    let width = grid
        .width
        .saturating_mul(CELL_COLUMNS)
        .saturating_add(2)
        .min(area.width);
    let height = grid.height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(Color::Red));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();
    for (index, segment) in snapshot.snake.iter().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(Color::Green));
        }
    }
}

/// Maps a grid cell to the terminal column/row of its left half.
///
/// Returns `None` for cells outside the grid or clipped by a small terminal.
#[must_use]
pub fn logical_to_terminal(inner: Rect, grid: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(grid) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.checked_add(x_offset)?;
    let y = inner.y.checked_add(y_offset)?;
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::config::{GameConfig, GridSize};
    use crate::game::{GameSession, GameStatus};
    use crate::input::Direction;
    use crate::snake::{Position, Snake};
    use crate::ui::hud::HudInfo;

    use super::{board_rect, logical_to_terminal, render};

    fn hud(high_score: u32) -> HudInfo {
        HudInfo {
            high_score,
            game_over_reference_high_score: high_score,
            advanced: false,
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    /// Eats once for 10 points, then turns into the top wall.
    fn session_ended_with_ten_points() -> GameSession {
        let snake = Snake::new(Position::new(0, 0), Direction::Right);
        let mut session =
            GameSession::from_layout(GameConfig::default(), snake, Position::new(1, 0), 7)
                .expect("layout should be valid");

        session.tick();
        assert!(session.set_direction(Direction::Up));
        session.tick();
        assert_eq!(session.status(), GameStatus::Terminated);
        assert_eq!(session.score(), 10);
        session
    }

    fn draw(session: &GameSession, hud_info: HudInfo) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).expect("test terminal");
        terminal
            .draw(|frame| render(frame, &session.snapshot(), hud_info))
            .expect("draw should succeed");
        screen_text(&terminal)
    }

    #[test]
    fn cells_map_to_two_columns() {
        let inner = Rect::new(1, 1, 20, 10);
        let grid = GridSize {
            width: 10,
            height: 10,
        };

        assert_eq!(logical_to_terminal(inner, grid, Position::new(0, 0)), Some((1, 1)));
        assert_eq!(logical_to_terminal(inner, grid, Position::new(3, 2)), Some((7, 3)));
        assert_eq!(logical_to_terminal(inner, grid, Position::new(9, 9)), Some((19, 10)));
        assert_eq!(logical_to_terminal(inner, grid, Position::new(10, 0)), None);
        assert_eq!(logical_to_terminal(inner, grid, Position::new(-1, 0)), None);
    }

    #[test]
    fn clipped_cells_are_skipped() {
        let inner = Rect::new(0, 0, 6, 2);
        let grid = GridSize {
            width: 10,
            height: 10,
        };

        assert_eq!(logical_to_terminal(inner, grid, Position::new(2, 1)), Some((4, 1)));
        assert_eq!(logical_to_terminal(inner, grid, Position::new(3, 0)), None);
        assert_eq!(logical_to_terminal(inner, grid, Position::new(0, 2)), None);
    }

    #[test]
    fn board_is_centered_and_clipped() {
        let grid = GridSize {
            width: 10,
            height: 5,
        };

        assert_eq!(board_rect(Rect::new(0, 0, 40, 11), grid), Rect::new(9, 2, 22, 7));
        assert_eq!(board_rect(Rect::new(0, 0, 8, 4), grid), Rect::new(0, 0, 8, 4));
    }

    #[test]
    fn frame_shows_snake_food_and_hud() {
        let snake = Snake::new(Position::new(2, 2), Direction::Right);
        let session =
            GameSession::from_layout(GameConfig::with_grid(8, 6), snake, Position::new(5, 4), 0)
                .expect("layout should be valid");
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).expect("test terminal");

        terminal
            .draw(|frame| render(frame, &session.snapshot(), hud(0)))
            .expect("draw should succeed");

        let text = screen_text(&terminal);
        assert!(text.contains("██"));
        assert!(text.contains("()"));
        assert!(text.contains("Score: 0 | Length: 1"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn paused_frame_shows_overlay() {
        let mut session =
            GameSession::new_with_seed(GameConfig::with_grid(20, 12), 0).expect("valid config");
        session.toggle_pause();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("test terminal");

        terminal
            .draw(|frame| render(frame, &session.snapshot(), hud(0)))
            .expect("draw should succeed");

        assert!(screen_text(&terminal).contains("PAUSED"));
    }

    #[test]
    fn record_score_is_announced_after_it_was_persisted() {
        let session = session_ended_with_ten_points();
        // The host has already folded the final score into `high_score`.
        let hud_info = HudInfo {
            high_score: 10,
            game_over_reference_high_score: 0,
            advanced: false,
        };

        let text = draw(&session, hud_info);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Final Score: 10"));
        assert!(text.contains("New high score!"));
    }

    #[test]
    fn matching_the_record_is_not_a_new_high_score() {
        let session = session_ended_with_ten_points();

        let text = draw(&session, hud(10));
        assert!(text.contains("GAME OVER"));
        assert!(!text.contains("New high score!"));
    }
}
