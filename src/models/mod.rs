pub mod author;
pub mod loaders;
pub mod status;
pub mod wire;

pub use author::{collect_valid_records, AuthorSlot, Candidate, InputRecord, ResolvedIdentity};
pub use loaders::{load_author_form, parse_author_form};
pub use status::{labels, PipelineOutcome, StatusClass};
pub use wire::{ProcessRequest, ProcessResponse, SearchRequest, SearchResponse};
