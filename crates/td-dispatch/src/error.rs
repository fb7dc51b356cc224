use td_agent::AgentError;
use td_core::{RequesterId, VehicleId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("requester {0} is not in the requester store")]
    UnknownRequester(RequesterId),

    #[error("vehicle {0} is not in the fleet")]
    UnknownVehicle(VehicleId),

    #[error("requester {0} must be waiting to be enqueued")]
    NotWaiting(RequesterId),

    #[error("agent state error: {0}")]
    Agent(#[from] AgentError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
