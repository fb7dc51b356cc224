use td_core::{RequesterId, VehicleId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("vehicle {0} already has an assignment")]
    VehicleBusy(VehicleId),

    #[error("vehicle {0} has no assignment")]
    VehicleIdle(VehicleId),

    #[error("requester {0} is {1}, expected {2}")]
    WrongRequesterState(RequesterId, &'static str, &'static str),
}

pub type AgentResult<T> = Result<T, AgentError>;
