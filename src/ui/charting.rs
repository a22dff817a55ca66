use ratatui::{
    layout::Direction,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup},
};

use crate::results::{Breakdown, FeedbackTone};

pub fn tone_color(tone: FeedbackTone) -> Color {
    match tone {
        FeedbackTone::Positive => Color::Green,
        FeedbackTone::Neutral => Color::Yellow,
        FeedbackTone::Retry => Color::Red,
    }
}

/// Bar text, e.g. `3 questions (75%)`
pub fn bar_text(count: usize, percent: u32) -> String {
    let noun = if count == 1 { "question" } else { "questions" };
    format!("{count} {noun} ({percent}%)")
}

/// Horizontal correct/incorrect chart for the results screen
pub fn breakdown_chart(breakdown: Breakdown) -> BarChart<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let bars = [
        Bar::default()
            .label(Line::from("Correct"))
            .value(breakdown.correct as u64)
            .text_value(bar_text(breakdown.correct, breakdown.correct_percent()))
            .style(Style::default().fg(Color::Green))
            .value_style(bold.fg(Color::Black).bg(Color::Green)),
        Bar::default()
            .label(Line::from("Incorrect"))
            .value(breakdown.incorrect as u64)
            .text_value(bar_text(breakdown.incorrect, breakdown.incorrect_percent()))
            .style(Style::default().fg(Color::Red))
            .value_style(bold.fg(Color::Black).bg(Color::Red)),
    ];

    BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max((breakdown.correct + breakdown.incorrect).max(1) as u64)
        .data(BarGroup::default().bars(&bars))
}
