use thiserror::Error;

use crate::core::CarId;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("record id {0} is not present in the current record set")]
    UnknownRecordId(CarId),

    #[error("record id {0} appears more than once in the loaded records")]
    DuplicateRecordId(CarId),

    #[error("a render pass is already in flight")]
    RenderInProgress,

    #[error("invalid data: {0}")]
    InvalidData(String),
}
