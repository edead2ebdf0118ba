pub mod app;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod controller;
pub mod document;
pub mod keys;
pub mod loader;
pub mod logging;
pub mod scroll;
pub mod slide;
pub mod source;
pub mod theme;
pub mod timer;
pub mod viewer;
pub mod watch;
