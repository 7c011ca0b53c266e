pub mod agent;
pub mod light_cone;
pub mod scheduler;
pub mod session;
