pub mod app_type;
pub mod locator;

pub use app_type::{AppTypeDetector, detect_app_types};
pub use locator::{ProjectLocation, ProjectLocator};
