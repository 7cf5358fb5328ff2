// Domain layer: object models and the ports the storage adapter talks through.

pub mod model;
pub mod ports;
