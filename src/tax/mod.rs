//! GST rates and per-voucher tax aggregation

pub mod aggregate;
pub mod gst;

pub use aggregate::*;
pub use gst::*;
