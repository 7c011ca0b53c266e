pub mod bed_camera;
pub mod flashlight;
pub mod survival;
