pub mod analysis;
pub mod candle;
pub mod indicator;
pub mod timeframe;

pub use analysis::*;
pub use candle::*;
pub use indicator::*;
pub use timeframe::*;
