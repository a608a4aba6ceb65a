//! Event dispatcher: one inbound frame in, replies and broadcasts out.
//!
//! Every domain failure here is recoverable: the offending connection
//! gets an `ERROR` reply and stays connected, and nobody else hears about
//! it. Lock discipline is uniform — take the session lock, do the
//! transition, release, then deliver. The one exception is `DONE`, where
//! the lock is held across the finalizer's roster fetch and record writes
//! so no mark can slip in mid-persist.

use std::sync::Arc;

use rollcall_attendance::{
    AttendanceError, RecordStore, RosterSource, finalize, tally,
};
use rollcall_protocol::{ClientEvent, Codec, Identity, ServerEvent};
use rollcall_session::{Authenticator, ClientSender};

use crate::RollcallError;
use crate::broadcast::broadcast;
use crate::server::ServerState;

/// Decodes and handles one inbound frame from an admitted connection.
pub(crate) async fn dispatch<A, R, S, C>(
    state: &Arc<ServerState<A, R, S, C>>,
    identity: &Identity,
    sender: &ClientSender,
    data: &[u8],
) -> Result<(), RollcallError>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    let event = match state.codec.decode_event(data) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(
                user_id = %identity.user_id,
                error = %e,
                "failed to decode frame"
            );
            return reply(state, sender, &ServerEvent::error(e.to_string()));
        }
    };

    match event {
        ClientEvent::AttendanceMarked { student_id, status } => {
            // Lock only for the transition, drop before delivery.
            let result = {
                let mut session = state.session.lock().await;
                session.mark(identity, student_id.clone(), status)
            };
            match result {
                Ok(()) => {
                    broadcast(
                        state,
                        &ServerEvent::AttendanceMarked { student_id, status },
                    )
                    .await?;
                }
                Err(e) => reply_error(state, sender, identity, &e)?,
            }
        }

        ClientEvent::TodaySummary {} => {
            // Snapshot the counters under the lock; the roster fetch and
            // the broadcast run without it.
            let snapshot = {
                let session = state.session.lock().await;
                session.active().and_then(|active| {
                    active.authorize_owner(identity)?;
                    Ok((active.class_id().clone(), active.present_count()))
                })
            };
            match snapshot {
                Ok((class_id, present)) => {
                    match state.roster.class_info(&class_id).await {
                        Ok(class) => {
                            let summary =
                                tally(present, class.roster_size());
                            broadcast(
                                state,
                                &ServerEvent::TodaySummary(summary),
                            )
                            .await?;
                        }
                        Err(e) => reply_error(
                            state,
                            sender,
                            identity,
                            &AttendanceError::from(e),
                        )?,
                    }
                }
                Err(e) => reply_error(state, sender, identity, &e)?,
            }
        }

        ClientEvent::MyAttendance {} => {
            let result = state.session.lock().await.my_status(identity);
            match result {
                Ok(status) => {
                    reply(
                        state,
                        sender,
                        &ServerEvent::MyAttendance { status },
                    )?;
                }
                Err(e) => reply_error(state, sender, identity, &e)?,
            }
        }

        ClientEvent::Done {} => {
            // The lock stays held across the whole finalize so the
            // persisted records and the broadcast summary agree exactly.
            let result = {
                let mut session = state.session.lock().await;
                finalize(
                    &mut session,
                    &state.roster,
                    &state.records,
                    identity,
                )
                .await
            };
            match result {
                Ok(summary) => {
                    broadcast(state, &ServerEvent::done(summary)).await?;
                }
                Err(e) => reply_error(state, sender, identity, &e)?,
            }
        }
    }

    Ok(())
}

/// Enqueues a frame for the originating connection only.
///
/// A failed enqueue means the writer task is gone and the handler is
/// already tearing down; there is nobody left to tell.
fn reply<A, R, S, C>(
    state: &Arc<ServerState<A, R, S, C>>,
    sender: &ClientSender,
    event: &ServerEvent,
) -> Result<(), RollcallError>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    let frame = state.codec.encode(event)?;
    if sender.send(frame).is_err() {
        tracing::debug!("reply dropped, writer task gone");
    }
    Ok(())
}

/// Sends a domain error back to the offending connection alone.
fn reply_error<A, R, S, C>(
    state: &Arc<ServerState<A, R, S, C>>,
    sender: &ClientSender,
    identity: &Identity,
    error: &AttendanceError,
) -> Result<(), RollcallError>
where
    A: Authenticator,
    R: RosterSource,
    S: RecordStore,
    C: Codec,
{
    tracing::debug!(
        user_id = %identity.user_id,
        error = %error,
        "event rejected"
    );
    reply(state, sender, &ServerEvent::error(error.to_string()))
}
