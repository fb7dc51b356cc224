use td_agent::AgentError;
use td_core::{CoreError, RequesterId, VehicleId};
use td_dispatch::DispatchError;
use td_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("requester {0} does not exist")]
    UnknownRequester(RequesterId),

    #[error("vehicle {0} does not exist")]
    UnknownVehicle(VehicleId),

    #[error("requester {0} is not idle or is hosting visitors")]
    RequesterBusy(RequesterId),

    #[error("requester {0} is in transit without a destination")]
    MissingDestination(RequesterId),

    #[error("grid error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("agent state error: {0}")]
    Agent(#[from] AgentError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

pub type SimResult<T> = Result<T, SimError>;
