//! Presentation layer: Bevy-based adaptation of the city core.
//!
//! Every module here is a thin adapter: the core produces plain data, and
//! these plugins turn it into entities, transforms, and input routing.

pub mod camera;
pub mod convert;
pub mod disclosure;
pub mod districts;
pub mod plugin;
pub mod records;
pub mod selection;
pub mod settings;
pub mod traffic;

pub use plugin::CityScenePlugin;
pub use settings::SceneSettings;
