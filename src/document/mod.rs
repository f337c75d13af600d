pub mod apply;
pub mod bundle;
pub mod extract;
pub mod model;
pub mod package;
