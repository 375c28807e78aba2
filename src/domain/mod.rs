// Domain layer: cart models and ports (interfaces). Adapters and the cart manager build on top.

pub mod model;
pub mod ports;
