// Stores - repository traits and their in-memory backends
//
// Backends are seeded from the JSON fixtures under `fixtures/` and live only
// as long as the process.

pub mod traits;
pub mod users;
pub mod oracle;

pub use traits::{draw_card, OracleStore, UserStore};
#[cfg(any(test, feature = "testing"))]
pub use traits::MockUserStore;
pub use users::{InMemoryUserStore, User, UserPatch};
pub use oracle::{InMemoryOracleStore, OracleCard};
