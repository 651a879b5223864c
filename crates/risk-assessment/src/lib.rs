pub mod assessor;
pub mod credit;
pub mod signal;
#[cfg(test)]
mod tests;

pub use assessor::{risk_grade, RiskAssessor};
pub use credit::CreditAssessor;
pub use signal::{IndustrySignalKind, MidpointSignal, SampledSignal};
