// Library surface for the binary, headless hosts and integration tests.
pub mod app;
pub mod app_dirs;
pub mod audio;
pub mod config;
pub mod keymap;
pub mod navigation;
pub mod practice;
pub mod progress;
pub mod runtime;
pub mod speller;
pub mod timers;
pub mod ui;
pub mod visibility;
pub mod word;
pub mod word_source;

/// How often the main loop wakes up to run due transitions.
pub const TICK_RATE_MS: u64 = 50;
