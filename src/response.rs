use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ServiceError;

/// Outcome of an invocation, carried on the wire as its HTTP code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Status {
    Ok,
    BadRequest,
    InternalServerError,
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::InternalServerError => 500,
        }
    }
}

impl TryFrom<u16> for Status {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            200 => Ok(Status::Ok),
            400 => Ok(Status::BadRequest),
            500 => Ok(Status::InternalServerError),
            other => Err(format!("unsupported status code {other}")),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub status_code: Status,
    pub headers: Value,
    pub body: Value,
}

impl From<Result<Value, ServiceError>> for ResponsePayload {
    fn from(result: Result<Value, ServiceError>) -> Self {
        let headers = json!({ "Content-Type": "application/json" });
        match result {
            Ok(body) => ResponsePayload {
                status_code: Status::Ok,
                headers,
                body,
            },
            Err(err) => ResponsePayload {
                status_code: err.status,
                headers,
                body: Value::String(err.msg),
            },
        }
    }
}

pub fn make_response_payload(
    result: Result<Value, ServiceError>,
) -> Result<Value, lambda_runtime::Error> {
    serde_json::to_value(ResponsePayload::from(result)).map_err(lambda_runtime::Error::from)
}
