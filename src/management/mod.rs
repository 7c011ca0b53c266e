pub mod audio_management;
pub mod config_management;
