mod app_config;
mod config;
mod error;
mod location;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use location::{
    Coordinates, LocationErrorKind, LocationState, NoticeLevel, PersistedLocation,
    PositionOptions, LOCATION_STORE_KEY,
};
