use crate::response::Status;
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;
use thiserror::Error;

/// Broken preconditions inside the fusion pipeline. Malformed record fields
/// are never errors; these only signal a defect in how clusters were built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FusionError {
    #[error("cannot merge an empty cluster")]
    EmptyCluster,
    #[error("cluster references record {index} but only {len} records were loaded")]
    MissingRecord { index: usize, len: usize },
}

/// Failure reported back to the Lambda caller; `status` becomes the
/// response payload's status code and `msg` its body.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceError {
    pub msg: String,
    pub status: Status,
}

impl ServiceError {
    fn with_status(status: Status, msg: impl fmt::Display) -> Self {
        ServiceError {
            msg: msg.to_string(),
            status,
        }
    }

    /// Input the caller can fix: malformed event or source file.
    pub fn bad_request(msg: impl fmt::Display) -> Self {
        Self::with_status(Status::BadRequest, msg)
    }

    pub fn internal_server_error(msg: impl fmt::Display) -> Self {
        Self::with_status(Status::InternalServerError, msg)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", u16::from(self.status), self.msg)
    }
}

impl error::Error for ServiceError {}

impl From<FusionError> for ServiceError {
    fn from(err: FusionError) -> Self {
        ServiceError::internal_server_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fusion_errors_surface_as_internal_errors() {
        let err = ServiceError::from(FusionError::MissingRecord { index: 7, len: 3 });
        assert!(matches!(err.status, Status::InternalServerError));
        assert_eq!(err.msg, "cluster references record 7 but only 3 records were loaded");
    }

    #[test]
    fn display_carries_status_code_and_message() {
        let err = ServiceError::bad_request("no sources");
        assert_eq!(err.to_string(), "[400] no sources");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status"], 400);
        assert_eq!(value["msg"], "no sources");
    }
}
