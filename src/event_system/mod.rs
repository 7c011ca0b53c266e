pub mod event_system_plugin;
pub mod haunt_events;
