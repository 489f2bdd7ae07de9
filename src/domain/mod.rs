// Domain layer: the coffee query, labels and verdicts, plus the ports the
// inference adapter depends on.

pub mod model;
pub mod ports;
