pub mod config;
pub mod error;
pub mod traits;
pub mod trigger;
pub mod types;

pub use config::{
    coerce_bool, coerce_f64, coerce_list, coerce_string, coerce_u64, ConfigNode,
    SearchConfiguration,
};
#[allow(deprecated)]
pub use config::legacy::LegacyConfigMap;
pub use error::*;
pub use traits::*;
pub use trigger::*;
pub use types::*;
