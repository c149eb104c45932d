pub mod dialog;
pub mod info;
pub mod listing;
pub mod status_bar;
pub mod viewer;
