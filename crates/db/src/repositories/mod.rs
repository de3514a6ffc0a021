//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the engine.
//! Mutating methods on the journal, inventory, and counter repositories are
//! transaction participants: the business-event adapter owns begin/commit.

pub mod chart;
pub mod counters;
pub mod inventory;
pub mod journal;
pub mod statements;

pub use chart::{ChartError, ChartInit, ChartRepository};
pub use counters::{CounterDrift, CounterError, CounterKind, CounterRepository};
pub use inventory::{
    ConsumeInput, InventoryError, InventoryRepository, ProduceLotInput, RestoredQuantity,
    StockOnHand,
};
pub use journal::{JournalError, JournalRepository, ReversedAccountTotal};
pub use statements::{StatementError, StatementRepository};
