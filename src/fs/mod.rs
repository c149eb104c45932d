pub mod directory;
pub mod lister;
pub mod operations;
pub mod path;
