use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::game::{CollisionType, Position, StateSnapshot, Status};
use crate::metrics::GameMetrics;

/// What the hand tracker currently sees, for the status line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandStatus {
    /// No tracker configured; keyboard steering only
    Keyboard,
    /// Tracker running but no hand in view
    Searching,
    Tracking {
        /// Grid cell under the smoothed fingertip
        pointer: Option<Position>,
        fist: bool,
    },
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &StateSnapshot,
        metrics: &GameMetrics,
        hand: HandStatus,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        let pointer = match hand {
            HandStatus::Tracking { pointer, .. } => pointer,
            _ => None,
        };
        let grid = self.render_grid(snapshot, pointer);
        frame.render_widget(grid, chunks[1]);

        if let Some(overlay) = self.render_overlay(snapshot) {
            let area = centered(chunks[1], 44, 8);
            frame.render_widget(Clear, area);
            frame.render_widget(overlay, area);
        }

        let controls = self.render_controls(snapshot, metrics, hand);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &StateSnapshot, pointer: Option<Position>) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(snapshot.grid_height);
        let head = snapshot.head();

        for y in 0..snapshot.grid_height {
            let mut spans = Vec::with_capacity(snapshot.grid_width);

            for x in 0..snapshot.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.is_snake(pos) {
                    // Snake body
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if Some(pos) == snapshot.food {
                    // Food
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if Some(pos) == pointer {
                    // Where the fingertip points
                    Span::styled("+ ", Style::default().fg(Color::Yellow))
                } else {
                    // Empty cell
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &StateSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(snapshot.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(snapshot.snake.len().to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{:.1}/s", snapshot.speed), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_overlay(&self, snapshot: &StateSnapshot) -> Option<Paragraph<'_>> {
        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let hint = Style::default().fg(Color::Gray);

        let (title, color, lines) = match snapshot.status {
            Status::Running => return None,
            Status::NotStarted => (
                "SNAKE",
                Color::Green,
                vec![
                    Line::from(Span::styled("Point with your index finger to steer", hint)),
                    Line::from(Span::styled("Make a fist to pause", hint)),
                    Line::from(Span::styled("Press SPACE to start", bold(Color::White))),
                ],
            ),
            Status::Paused => (
                "PAUSED",
                Color::Yellow,
                vec![Line::from(Span::styled(
                    "Make a fist (or press P) to resume",
                    hint,
                ))],
            ),
            Status::GameOver => {
                let cause = match snapshot.collision {
                    Some(CollisionType::Wall) => "Hit the wall",
                    Some(CollisionType::SelfCollision) => "Bit your own tail",
                    None => "",
                };
                (
                    "GAME OVER",
                    Color::Red,
                    vec![
                        Line::from(Span::styled(cause, hint)),
                        score_line(snapshot),
                        Line::from(Span::styled("Press SPACE to restart", bold(Color::White))),
                    ],
                )
            }
            Status::Won => (
                "YOU WIN",
                Color::Green,
                vec![
                    Line::from(Span::styled("The snake fills the board", hint)),
                    score_line(snapshot),
                    Line::from(Span::styled("Press SPACE to restart", bold(Color::White))),
                ],
            ),
        };

        let mut text = vec![Line::from(Span::styled(title, bold(color))), Line::from("")];
        text.extend(lines);

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
        )
    }

    fn render_controls(
        &self,
        snapshot: &StateSnapshot,
        metrics: &GameMetrics,
        hand: HandStatus,
    ) -> Paragraph<'_> {
        let hand_span = match hand {
            HandStatus::Keyboard => {
                Span::styled("Keyboard", Style::default().fg(Color::Gray))
            }
            HandStatus::Searching => {
                Span::styled("No hand", Style::default().fg(Color::DarkGray))
            }
            HandStatus::Tracking { fist: true, .. } => {
                Span::styled("Fist", Style::default().fg(Color::Magenta))
            }
            HandStatus::Tracking { fist: false, .. } => {
                Span::styled("Tracking", Style::default().fg(Color::Green))
            }
        };

        let mut spans = vec![
            Span::styled("Hand: ", Style::default().fg(Color::Yellow)),
            hand_span,
        ];
        if hand != HandStatus::Keyboard {
            spans.push(Span::raw(format!(" ({:.0} fps)", metrics.capture_rate())));
        }
        spans.extend([
            Span::raw(" | "),
            Span::styled(snapshot.direction.as_str(), Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" steer | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ]);

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn score_line(snapshot: &StateSnapshot) -> Line<'static> {
    Line::from(vec![
        Span::styled("Score: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            snapshot.score.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Best: ", Style::default().fg(Color::Yellow)),
        Span::styled(snapshot.high_score.to_string(), Style::default().fg(Color::White)),
    ])
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
