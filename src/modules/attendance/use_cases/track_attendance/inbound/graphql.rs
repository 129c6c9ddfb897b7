use async_graphql::{Context, Object, Result as GqlResult};
use chrono::NaiveDate;

use crate::modules::attendance::core::capability::Actor;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::status::WorkMode;
use crate::modules::attendance::use_cases::track_attendance::command::{
    AttendanceAction, TrackAttendance,
};
use crate::shell::state::AppState;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn clock_in(
        &self,
        context: &Context<'_>,
        employee_id: String,
        work_mode: Option<WorkMode>,
        location: Option<String>,
        device_info: Option<String>,
    ) -> GqlResult<AttendanceRecord> {
        let mut command = command(context, employee_id, AttendanceAction::ClockIn, None)?;
        command.work_mode = work_mode;
        command.location = location;
        command.device_info = device_info;
        handle(context, command).await
    }

    async fn clock_out(
        &self,
        context: &Context<'_>,
        employee_id: String,
        date: Option<NaiveDate>,
    ) -> GqlResult<AttendanceRecord> {
        let command = command(context, employee_id, AttendanceAction::ClockOut, date)?;
        handle(context, command).await
    }

    async fn start_break(
        &self,
        context: &Context<'_>,
        employee_id: String,
    ) -> GqlResult<AttendanceRecord> {
        let command = command(context, employee_id, AttendanceAction::StartBreak, None)?;
        handle(context, command).await
    }

    async fn end_break(
        &self,
        context: &Context<'_>,
        employee_id: String,
    ) -> GqlResult<AttendanceRecord> {
        let command = command(context, employee_id, AttendanceAction::EndBreak, None)?;
        handle(context, command).await
    }
}

fn command(
    context: &Context<'_>,
    employee_id: String,
    action: AttendanceAction,
    date: Option<NaiveDate>,
) -> GqlResult<TrackAttendance> {
    let state = context.data_unchecked::<AppState>();
    let actor = context.data::<Actor>()?.clone();
    let mut command = TrackAttendance::new(employee_id, action, state.clock.now());
    command.actor = actor;
    command.date = date;
    Ok(command)
}

async fn handle(context: &Context<'_>, command: TrackAttendance) -> GqlResult<AttendanceRecord> {
    let state = context.data_unchecked::<AppState>();
    state
        .track_handler
        .handle(command)
        .await
        .map_err(|e| async_graphql::Error::new(e.to_string()))
}
