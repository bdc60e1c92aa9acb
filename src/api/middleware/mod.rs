pub mod timing;

pub use timing::RequestTiming;
