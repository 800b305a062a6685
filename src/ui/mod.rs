pub mod app;
pub mod background;
pub mod help_panel;
pub mod notice;
pub mod settings;
pub mod settings_io;
pub mod settings_panel;
pub mod story_panel;
