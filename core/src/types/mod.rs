pub mod param;

pub use param::{Model, Param, ParamKind, ParamValue, Seed};
