use ratatui::{buffer::Buffer, layout::Rect};

use crate::{app::App, routes::Route};

/// A UI screen boundary: each route renders through one of these
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct DashboardScreen;

impl Screen for DashboardScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        super::render_dashboard(app, area, buf);
    }
}

/// Quiz-taking screen, including the submit confirmation overlay
pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        super::render_quiz(app, area, buf);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        super::render_results(app, area, buf);
    }
}

/// Helper to construct the screen for the current route
pub fn current_screen(route: Route) -> Box<dyn Screen> {
    match route {
        Route::Dashboard => Box::new(DashboardScreen),
        Route::QuizTake => Box::new(QuizScreen),
        Route::QuizResults => Box::new(ResultsScreen),
    }
}
