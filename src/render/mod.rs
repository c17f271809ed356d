pub mod composite;
pub mod cpu;
pub mod offscreen;
pub mod scene;
pub mod surface;
