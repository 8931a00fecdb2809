pub mod api;
pub mod cache;
pub mod dex;
pub mod logging;
pub mod model;
pub mod typecalc;
