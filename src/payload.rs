//! Decoding API response bodies into store intents.
//!
//! The network layer itself lives outside this crate. It hands over the raw
//! body of each response, split by outcome, and gets back the intent to
//! dispatch. A success body that fails to decode becomes a failure intent
//! carrying the parse error, so the store never sees half-decoded data.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::store::{ControllerAction, DriverAction, LaptimeAction};
use crate::types::{Controller, Driver, LapTime};
use crate::{DashboardError, Result};

/// Collections arrive either bare or wrapped as `{"data": ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail", alias = "message")]
    error: serde_json::Value,
}

/// Outcome of one API request, as raw bodies
pub type RawResponse<'a> = std::result::Result<&'a str, &'a str>;

/// Decode a success body, unwrapping a `data` envelope if present.
pub fn decode_data<T: DeserializeOwned>(body: &str, context: &str) -> Result<T> {
    match serde_json::from_str::<Envelope<T>>(body) {
        Ok(Envelope::Wrapped { data }) | Ok(Envelope::Bare(data)) => Ok(data),
        Err(e) => Err(DashboardError::parse(context, e)),
    }
}

/// Human-readable message from a failure body.
///
/// Understands `{"error": ...}` (and FastAPI's `{"detail": ...}`); anything
/// else is passed through trimmed.
pub fn decode_error(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: serde_json::Value::String(message) }) => message,
        Ok(ErrorBody { error }) => error.to_string(),
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn decode_or_fail<T, A>(
    response: RawResponse<'_>,
    context: &str,
    success: impl FnOnce(T) -> A,
    failure: impl FnOnce(String) -> A,
) -> A
where
    T: DeserializeOwned,
{
    match response {
        Ok(body) => match decode_data(body, context) {
            Ok(data) => {
                debug!(context, bytes = body.len(), "Decoded response");
                success(data)
            }
            Err(e) => {
                warn!(context, error = %e, "Undecodable response body");
                failure(e.to_string())
            }
        },
        Err(body) => failure(decode_error(body)),
    }
}

/// Intent for a finished `GET /scores`
pub fn laptimes_action(response: RawResponse<'_>) -> LaptimeAction {
    decode_or_fail::<Vec<LapTime>, _>(
        response,
        "lap times",
        LaptimeAction::LoadLaptimesSuccess,
        LaptimeAction::LoadLaptimesFailure,
    )
}

/// Intent for a finished `GET /drivers`
pub fn drivers_action(response: RawResponse<'_>) -> DriverAction {
    decode_or_fail::<Vec<Driver>, _>(
        response,
        "drivers",
        DriverAction::LoadDriversSuccess,
        DriverAction::LoadDriversFailure,
    )
}

/// Intent for a finished `GET /activedriver`
pub fn active_driver_action(response: RawResponse<'_>) -> DriverAction {
    decode_or_fail::<Driver, _>(
        response,
        "active driver",
        DriverAction::LoadActiveDriverSuccess,
        DriverAction::LoadActiveDriverFailure,
    )
}

/// Intent for a finished `GET /controllers`
pub fn controllers_action(response: RawResponse<'_>) -> ControllerAction {
    decode_or_fail::<Vec<Controller>, _>(
        response,
        "controllers",
        ControllerAction::LoadControllersSuccess,
        ControllerAction::LoadControllersFailure,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAPS: &str = r#"[
        {"id": 1, "driver": {"id": 1, "name": "Ana"}, "car": "GT3", "trackName": "Spa",
         "trackConfig": "GP", "time": 90.5, "setAt": "2024-05-11T18:22:03Z"},
        {"id": 2, "driver": {"id": 2, "name": "Ben"}, "car": "GT3", "trackName": "Spa",
         "trackConfig": "GP", "time": 88.2, "setAt": "2024-05-11T18:25:40Z"}
    ]"#;

    #[test]
    fn bare_and_wrapped_bodies_decode() {
        match laptimes_action(Ok(LAPS)) {
            LaptimeAction::LoadLaptimesSuccess(laps) => assert_eq!(laps.len(), 2),
            other => panic!("unexpected {other:?}"),
        }

        let wrapped = format!(r#"{{"data": {LAPS}}}"#);
        match laptimes_action(Ok(&wrapped)) {
            LaptimeAction::LoadLaptimesSuccess(laps) => assert_eq!(laps[1].time, 88.2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_success_body_becomes_failure() {
        match laptimes_action(Ok(r#"[{"id": "one"}]"#)) {
            LaptimeAction::LoadLaptimesFailure(message) => assert!(message.contains("lap times")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failure_bodies() {
        assert_eq!(decode_error(r#"{"error": "Database locked"}"#), "Database locked");
        assert_eq!(decode_error(r#"{"detail": "Not Found"}"#), "Not Found");
        assert_eq!(decode_error(r#"{"error": {"code": 7}}"#), r#"{"code":7}"#);
        assert_eq!(decode_error("  Bad Gateway\n"), "Bad Gateway");
        assert_eq!(decode_error(""), "Unknown error");

        assert_eq!(
            controllers_action(Err(r#"{"error": "timeout"}"#)),
            ControllerAction::LoadControllersFailure("timeout".into())
        );
    }

    #[test]
    fn driver_bodies() {
        let action = active_driver_action(Ok(r#"{"id": 3, "name": "Cy", "trackTime": 3600.5}"#));
        match action {
            DriverAction::LoadActiveDriverSuccess(driver) => {
                assert_eq!(driver.id, 3);
                assert_eq!(driver.track_time, 3600.5);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(drivers_action(Ok("[]")), DriverAction::LoadDriversSuccess(d) if d.is_empty()));
    }
}
