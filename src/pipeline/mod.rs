// Pipelines — multi-step workflows that drive the gate over many inputs.

pub mod check;
