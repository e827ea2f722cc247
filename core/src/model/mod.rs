pub mod counter;
pub mod fuel;
pub mod inspection;
pub mod maintenance;
pub mod record;
pub mod visitor;

pub use counter::{DailyCounter, MonthlyCounter};
pub use fuel::FuelLog;
pub use inspection::{CheckedItem, Condition, Inspection, ItemStatus};
pub use maintenance::{MaintenanceRequest, RequestStatus, Urgency};
pub use record::{AnyRecord, Collection, Identified, Namespace, Tabular};
pub use visitor::{TimeslotEntry, VisitorSession};
