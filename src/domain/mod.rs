// Domain layer: records, datasets and the two ports (Source, Step).

pub mod model;
pub mod ports;
