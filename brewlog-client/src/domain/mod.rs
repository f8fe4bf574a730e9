pub mod offline;
pub mod pending;

pub use offline::{OfflineRecipe, SyncEnvelope, SyncStatus};
pub use pending::{FailedOperation, OperationKind, PendingOperation};
