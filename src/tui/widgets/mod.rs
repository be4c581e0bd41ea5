pub mod header;
pub mod next_prayer;
pub mod prayers;
pub mod qibla;
pub mod statusbar;
