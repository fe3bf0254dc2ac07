pub mod combinations;
pub mod layout;
pub mod presets;
