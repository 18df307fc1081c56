pub mod limits;
pub mod record_set;
pub mod scale;
pub mod types;
pub mod x_key;

pub use limits::{AxisLimits, ChartLimits, compute_limits};
pub use record_set::RecordSet;
pub use scale::{LinearScale, PixelRange};
pub use types::{CarId, CarRecord, CylinderCount, FuelType, Manufacturer, Viewport};
pub use x_key::{XAxisKind, XKeyTransformer};
