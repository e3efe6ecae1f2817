// Domain layer: news models and ports (interfaces) shared by the client, service and CLI.

pub mod model;
pub mod ports;
