pub mod entity;
pub mod mutation;
pub mod query;
pub mod record;

pub mod prelude {
    pub use crate::entity::{CellFormat, Column, EntityDescriptor, EntityOperation, FormField};
    pub use crate::mutation::{FormPayload, MutationKind, MutationRequest, MutationResponse};
    pub use crate::query::{ListQuery, QueryPatch, SortKey, UnknownSortKey};
    pub use crate::record::{ListSnapshot, RecordId, RowRecord};
}
