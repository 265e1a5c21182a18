pub mod author_service;
pub mod disambiguation_gate;
pub mod row_ledger;

pub use author_service::AuthorService;
pub use disambiguation_gate::{ChoiceGate, ChoicePrompt, DisambiguationGate, OperatorHandle};
pub use row_ledger::{RowEntry, RowKey, RowLedger, StatusTable};
