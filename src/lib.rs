// Library surface for the binary and the headless integration tests.
pub mod answers;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod handoff;
pub mod logging;
pub mod question;
pub mod results;
pub mod review;
pub mod routes;
pub mod runtime;
pub mod scorer;
pub mod session;
pub mod settings;
pub mod timer;
pub mod ui;
pub mod util;
