pub mod legacy;
pub mod node;
pub mod reader;

pub use node::ConfigNode;
pub use reader::{
    coerce_bool, coerce_f64, coerce_list, coerce_string, coerce_u64, SearchConfiguration,
};
