pub mod rpc;

pub use rpc::{bonding_curve_address, SolanaCurveReader, PUMP_PROGRAM_ID};
