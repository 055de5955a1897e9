// Domain layer: models and ports shared by the tagging core and its adapters.

pub mod model;
pub mod ports;
