//! LED commands — turn on, turn off
//!
//! Each handler hands its command to the Dispatcher and returns the
//! outcome sentence as-is. Device failures are part of that sentence; a
//! handler never turns them into an error for the caller.

use tiny_http::Method;

use crate::dispatcher::Dispatcher;
use crate::domain::Command;

pub const TURN_ON_PATH: &str = "/api/led/on";
pub const TURN_OFF_PATH: &str = "/api/led/off";

pub fn turn_on_led(dispatcher: &Dispatcher) -> String {
    dispatcher.dispatch(Command::TurnOn)
}

pub fn turn_off_led(dispatcher: &Dispatcher) -> String {
    dispatcher.dispatch(Command::TurnOff)
}

/// Status code and plain-text body for one HTTP request
#[derive(Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Route a request to its handler. The query string plays no part.
pub fn route(dispatcher: &Dispatcher, method: &Method, url: &str) -> Reply {
    let path = url.split('?').next().unwrap_or(url);
    let handler: fn(&Dispatcher) -> String = match path {
        TURN_ON_PATH => turn_on_led,
        TURN_OFF_PATH => turn_off_led,
        _ => return Reply::new(404, format!("Not found: {path}")),
    };
    if *method != Method::Get {
        return Reply::new(405, format!("Method {method} not allowed on {path}"));
    }
    // Device failures are still 200: the API call itself succeeded.
    Reply::new(200, handler(dispatcher))
}
