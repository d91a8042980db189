pub mod graphql;
pub mod meta;
pub mod request;
pub mod response;

pub use graphql::{GraphqlError, GraphqlRequest, GraphqlResponse};
pub use meta::{Meta, MetaDraft, Table};
pub use request::{RequestKind, RequestPayload};
pub use response::{ErrorBody, ItemsBody, SavedBody, UpdatedBody};
