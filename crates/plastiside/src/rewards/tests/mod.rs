mod analytics;
mod common;
mod settings;
