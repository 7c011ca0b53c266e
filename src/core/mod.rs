pub mod components;
pub mod haunt_config;
pub mod haunt_error;
pub mod haunt_plugin;
pub mod resources;
pub mod seeded_or_not;
pub mod spawn_point;
