pub mod charting;
pub mod screen;
pub mod text;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};

use self::screen::Screen;
use crate::{
    app::{App, Notice, TYPE_KEYS},
    results::ResultsRecord,
    review::ReviewState,
    session::{QuizSession, SessionPhase},
    util::format_clock,
};

const HORIZONTAL_MARGIN: u16 = 3;
const VERTICAL_MARGIN: u16 = 1;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        screen::current_screen(self.route()).render(self, chunks[0], buf);

        if let Some(notice) = self.notice() {
            let style = match notice {
                Notice::Info(_) => Style::default().fg(Color::Cyan),
                Notice::Error(_) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            };
            Paragraph::new(Span::styled(notice.text().to_string(), style))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

pub(crate) fn render_dashboard(app: &App, area: Rect, buf: &mut Buffer) {
    let settings = &app.settings;
    let bank = app.source_bank();

    let mut lines = vec![
        Line::from(Span::styled("vquiz", bold().fg(Color::Magenta))),
        Line::from(Span::styled(
            format!("{} ({} questions available)", bank.title(), bank.len()),
            dim(),
        )),
        Line::default(),
        Line::from(Span::styled("Quiz Configuration", bold())),
        Line::from(format!(
            "Number of questions: {}   (+/-)",
            settings.question_count
        )),
        Line::from(format!("Difficulty: {}   (d)", settings.difficulty)),
        Line::from(format!(
            "Time limit: {}   Shuffle: {}   (x)",
            format_clock(settings.time_limit_secs),
            on_off(settings.shuffle)
        )),
        Line::from("Question types:"),
    ];

    for (i, kind) in TYPE_KEYS.iter().enumerate() {
        let checked = settings.question_types.contains(kind);
        lines.push(Line::from(vec![
            Span::raw(format!("  ({}) ", i + 1)),
            Span::styled(
                if checked { "[x] " } else { "[ ] " },
                if checked {
                    bold().fg(Color::Green)
                } else {
                    dim()
                },
            ),
            Span::raw(kind.to_string()),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(t)ake quiz / (r)esults / (q)uit",
        italic(),
    )));

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Dashboard"))
        .wrap(Wrap { trim: false })
        .render(inset(area), buf);
}

pub(crate) fn render_quiz(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.session() else {
        return;
    };
    let Some(question) = session.current_question() else {
        return;
    };
    let area = inset(area);
    let index = session.current_index();
    let total = session.bank().len();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title + clock
            Constraint::Length(1), // question counter
            Constraint::Length(1), // progress gauge
            Constraint::Length(1), // padding
            Constraint::Min(3),    // question card
            Constraint::Length(1), // legend
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(8)])
        .split(chunks[0]);
    Paragraph::new(Span::styled(session.bank().title().to_string(), bold())).render(header[0], buf);
    Paragraph::new(Span::styled(session.timer().display(), bold().fg(Color::Yellow)))
        .alignment(Alignment::Right)
        .render(header[1], buf);

    let progress = session.progress_percent();
    let counter = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(14)])
        .split(chunks[1]);
    Paragraph::new(format!("Question {} of {}", index + 1, total)).render(counter[0], buf);
    Paragraph::new(Span::styled(format!("{progress}% Complete"), bold()))
        .alignment(Alignment::Right)
        .render(counter[1], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(progress.min(100) as u16)
        .label("")
        .render(chunks[2], buf);

    let chosen = session.answer_for(index);
    let mut lines = vec![
        Line::from(Span::styled(question.prompt.clone(), bold())),
        Line::default(),
    ];
    for (i, option) in question.options.iter().enumerate() {
        let is_cursor = i == app.option_cursor();
        let is_chosen = chosen == Some(option.as_str());
        let marker = if is_chosen { "(•)" } else { "( )" };
        let style = match (is_cursor, is_chosen) {
            (_, true) => bold().fg(Color::Green),
            (true, false) => Style::default().add_modifier(Modifier::UNDERLINED),
            _ => Style::default(),
        };
        lines.push(Line::from(vec![
            Span::raw(if is_cursor { "> " } else { "  " }),
            Span::raw(format!("{} ", i + 1)),
            Span::styled(format!("{marker} {option}"), style),
        ]));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Question {}", index + 1)),
        )
        .wrap(Wrap { trim: false })
        .render(chunks[4], buf);

    let legend = if session.is_last_question() {
        "(←/→) prev/next / (↑/↓) move / (enter) select / (s)ubmit quiz / (esc) leave"
    } else {
        "(←/→) prev/next / (↑/↓) move / (enter) select / (esc) leave"
    };
    Paragraph::new(Span::styled(legend, italic())).render(chunks[5], buf);

    if let SessionPhase::ConfirmPending { unanswered } = session.phase() {
        render_confirm_dialog(session, unanswered, area, buf);
    }
}

fn render_confirm_dialog(session: &QuizSession, unanswered: usize, area: Rect, buf: &mut Buffer) {
    let total = session.bank().len();
    let popup = centered_rect(60, 9, area);
    Clear.render(popup, buf);

    let lines = vec![
        Line::from(Span::styled(
            "You have unanswered questions",
            bold().fg(Color::Yellow),
        )),
        Line::from(format!(
            "{unanswered} of {total} questions are unanswered. Unanswered questions will be marked as incorrect."
        )),
        Line::default(),
        Line::from(Span::styled(
            "(y) Submit Quiz / (n) Continue Quiz",
            italic(),
        )),
    ];

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Submit Quiz?"))
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

pub(crate) fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(review) = app.review() else {
        return;
    };
    let record = review.record();
    let area = inset(area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(1), // score line
            Constraint::Length(1), // gauge
            Constraint::Length(2), // feedback
            Constraint::Length(4), // breakdown chart
            Constraint::Min(3),    // question review
            Constraint::Length(1), // legend
        ])
        .split(area);

    let mut title = vec![Line::from(Span::styled(
        format!(
            "Quiz Results: {}",
            record.title.as_deref().unwrap_or("Quiz")
        ),
        bold(),
    ))];
    if let Some(at) = record.completed_at {
        title.push(Line::from(Span::styled(
            format!("Completed on {}", at.format("%Y-%m-%d %H:%M")),
            dim(),
        )));
    }
    Paragraph::new(title).render(chunks[0], buf);

    let percentage = record.percentage_score();
    let tone = record.feedback_tone();
    let color = charting::tone_color(tone);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{percentage}%"), bold().fg(color)),
        Span::raw(format!(
            "   {} of {} correct",
            record.score, record.total_questions
        )),
    ]))
    .render(chunks[1], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(color))
        .percent(percentage.min(100) as u16)
        .label("")
        .render(chunks[2], buf);

    Paragraph::new(vec![
        Line::from(Span::styled(tone.headline(), bold().fg(color))),
        Line::from(Span::styled(tone.detail(), Style::default().fg(color))),
    ])
    .render(chunks[3], buf);

    charting::breakdown_chart(record.breakdown()).render(chunks[4], buf);

    render_review_list(review, chunks[5], buf);

    Paragraph::new(Span::styled(
        "(↑/↓) select / (enter) expand / (e)xport / (r)etry / (d)ashboard / (esc)ape",
        italic(),
    ))
    .render(chunks[6], buf);
}

/// Lines of the question review list, and the line the cursor item starts on.
pub fn review_lines(review: &ReviewState, width: usize) -> (Vec<Line<'static>>, usize) {
    let record: &ResultsRecord = review.record();
    let mut lines = Vec::new();
    let mut cursor_line = 0;
    let detail_width = width.saturating_sub(6).max(10);

    for (i, outcome) in record.outcomes().enumerate() {
        let q = outcome.question;
        let selected = i == review.cursor();
        if selected {
            cursor_line = lines.len();
        }
        let expanded = review.is_expanded(q.id);

        let (mark, mark_style) = if outcome.correct {
            ("✓", bold().fg(Color::Green))
        } else {
            ("✗", bold().fg(Color::Red))
        };
        let caret = if expanded { "▾" } else { "▸" };
        let prompt_width = width.saturating_sub(8);
        lines.push(Line::from(vec![
            Span::raw(if selected { "> " } else { "  " }),
            Span::styled(mark, mark_style),
            Span::raw(format!(" {caret} ")),
            Span::styled(
                text::truncate_to_width(&q.prompt, prompt_width),
                if selected { bold() } else { Style::default() },
            ),
        ]));

        if !expanded {
            continue;
        }

        let answer_style = if outcome.correct {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        push_labelled(
            &mut lines,
            "Your answer: ",
            outcome.given_or_placeholder(),
            answer_style,
            detail_width,
        );
        if !outcome.correct {
            push_labelled(
                &mut lines,
                "Correct answer: ",
                &q.correct_answer,
                Style::default().fg(Color::Green),
                detail_width,
            );
        }
        push_labelled(
            &mut lines,
            "Explanation: ",
            &q.explanation,
            Style::default().fg(Color::Blue),
            detail_width,
        );
    }

    (lines, cursor_line)
}

fn push_labelled(
    lines: &mut Vec<Line<'static>>,
    label: &'static str,
    value: &str,
    style: Style,
    width: usize,
) {
    const INDENT: &str = "      ";
    let value_width = width.saturating_sub(label.len()).max(1);
    for (i, chunk) in text::wrap_text(value, value_width).into_iter().enumerate() {
        let lead = if i == 0 {
            Span::styled(label, bold())
        } else {
            Span::raw(" ".repeat(label.len()))
        };
        lines.push(Line::from(vec![
            Span::raw(INDENT),
            lead,
            Span::styled(chunk, style),
        ]));
    }
}

fn render_review_list(review: &ReviewState, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Question Review");
    let inner = block.inner(area);
    block.render(area, buf);

    let (lines, cursor_line) = review_lines(review, inner.width as usize);
    let height = inner.height as usize;
    let offset = if height == 0 {
        0
    } else {
        cursor_line.saturating_sub(height.saturating_sub(1))
    };

    Paragraph::new(lines)
        .scroll((offset as u16, 0))
        .render(inner, buf);
}

fn inset(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(0)])
        .split(area)[0]
}

/// Rect of `width_percent` of the area's width and `height` rows, centered
fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * width_percent as u32 / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
