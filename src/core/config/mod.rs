pub mod data;
pub mod io;
pub mod printing;


pub use data::{
    backend_origin_from, path_display, Config, ConfigKey, BACKEND_URL_ENV, DEFAULT_BACKEND_ORIGIN,
};
pub use io::ConfigError;
