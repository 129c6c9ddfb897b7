use async_graphql::{EmptySubscription, Schema};

pub use crate::modules::attendance::use_cases::monthly_summary::inbound::graphql::QueryRoot;
pub use crate::modules::attendance::use_cases::track_attendance::inbound::graphql::MutationRoot;
pub use crate::shell::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}
