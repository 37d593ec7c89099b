pub mod cancel;
pub mod colors;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod explorer;
pub mod font;
pub mod mandelbrot;
pub mod viewer;
