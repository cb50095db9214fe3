mod api;
mod callable;
mod container;
mod entity;
mod r#enum;
mod schema;

pub use api::{ApiConfig, ParseOptions};
pub use callable::{CallableConfig, ParameterConfig, ReturnConfig};
pub use container::{ContainerConfig, EntitySetConfig, SingletonConfig};
pub use entity::{EntityConfig, FieldConfig};
pub use r#enum::{EnumConfig, EnumMember};
pub use schema::SchemaConfig;
