// Domain layer: check results, figure primitives and the ports the binaries plug storage into.

pub mod model;
pub mod ports;
