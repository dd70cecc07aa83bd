// Domain layer: schedule model, ports and the pure transformations between them.

pub mod model;
pub mod ports;

pub mod services;
