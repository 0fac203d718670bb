pub mod demo;
pub mod view;
