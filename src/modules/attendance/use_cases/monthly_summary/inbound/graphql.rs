use async_graphql::{Context, Object, Result as GqlResult};
use chrono::NaiveDate;

use crate::modules::attendance::core::capability::Actor;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::use_cases::monthly_summary::projection::MonthlySummary;
use crate::shell::state::AppState;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn record(
        &self,
        context: &Context<'_>,
        employee_id: String,
        date: NaiveDate,
    ) -> GqlResult<Option<AttendanceRecord>> {
        let state = context.data_unchecked::<AppState>();
        let actor = context.data::<Actor>()?;
        state
            .queries
            .record(actor, &employee_id, date)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }

    async fn monthly_summary(
        &self,
        context: &Context<'_>,
        employee_id: String,
        year: i32,
        month: u32,
    ) -> GqlResult<MonthlySummary> {
        let state = context.data_unchecked::<AppState>();
        let actor = context.data::<Actor>()?;
        state
            .queries
            .monthly_summary(actor, &employee_id, year, month)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}
