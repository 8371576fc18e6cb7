//! The `{code, msg, data}` response envelope.
//!
//! Every JSON body the server returns is wrapped in an envelope. A body is a
//! valid envelope only if it is a JSON object with a numeric `code` and a
//! string `msg`; `data` may be absent and is then `null`. Parsing JSON that is
//! shaped differently (an array, an object without `msg`, ...) is an error even
//! though the text itself is valid JSON.
//!
//! ```
//! use arts_api_core::parse_envelope;
//!
//! let envelope = parse_envelope(br#"{"code":40001,"msg":"insufficient balance"}"#)
//!     .expect("envelope");
//! assert!(!envelope.is_success());
//! assert!(envelope.data.is_null());
//!
//! assert!(parse_envelope(br#"[1, 2, 3]"#).is_err());
//! ```

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DecodeError;

/// Code signalling success.
pub const SUCCESS_CODE: i64 = 0;

/// A typed response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// `0` on success, a business error code otherwise.
    pub code: i64,
    /// Server-authored message.
    pub msg: String,
    /// Payload.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Returns `true` if `code` is [`SUCCESS_CODE`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Consume into the payload.
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }

    /// Transform the payload.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        Envelope {
            code: self.code,
            msg: self.msg,
            data: f(self.data),
        }
    }
}

/// A structurally validated envelope whose payload is still untyped.
pub type RawEnvelope = Envelope<Value>;

impl RawEnvelope {
    /// Decode the payload as `T`.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<Envelope<T>, DecodeError> {
        let Self { code, msg, data } = self;
        let data = crate::from_value(data)?;
        Ok(Envelope { code, msg, data })
    }
}

/// A body that could not be read as an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EnvelopeError {
    /// The body is not JSON.
    #[display("invalid JSON: {message}")]
    InvalidJson {
        /// Parser message.
        message: String,
        /// Body text.
        raw: String,
    },

    /// The body is JSON but not shaped like an envelope.
    #[display("not a valid envelope: {reason}")]
    NotAnEnvelope {
        /// What is missing or mistyped.
        reason: &'static str,
        /// Body text.
        raw: String,
    },
}

impl EnvelopeError {
    /// The body text that failed to parse.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::InvalidJson { raw, .. } | Self::NotAnEnvelope { raw, .. } => raw,
        }
    }

    /// Consume into the body text.
    #[must_use]
    pub fn into_raw(self) -> String {
        match self {
            Self::InvalidJson { raw, .. } | Self::NotAnEnvelope { raw, .. } => raw,
        }
    }
}

/// Parse and structurally validate a response body.
pub fn parse_envelope(body: &[u8]) -> Result<RawEnvelope, EnvelopeError> {
    let raw = || String::from_utf8_lossy(body).into_owned();

    let value: Value = serde_json::from_slice(body).map_err(|e| EnvelopeError::InvalidJson {
        message: e.to_string(),
        raw: raw(),
    })?;

    let Value::Object(mut fields) = value else {
        return Err(EnvelopeError::NotAnEnvelope {
            reason: "expected a JSON object",
            raw: raw(),
        });
    };

    let code = read_code(&fields).map_err(|reason| EnvelopeError::NotAnEnvelope {
        reason,
        raw: raw(),
    })?;

    let msg = match fields.remove("msg") {
        Some(Value::String(msg)) => msg,
        Some(_) => {
            return Err(EnvelopeError::NotAnEnvelope {
                reason: "`msg` is not a string",
                raw: raw(),
            });
        }
        None => {
            return Err(EnvelopeError::NotAnEnvelope {
                reason: "missing `msg`",
                raw: raw(),
            });
        }
    };

    let data = fields.remove("data").unwrap_or(Value::Null);

    Ok(Envelope { code, msg, data })
}

/// Any JSON number is a code. A fractional code is rounded away from zero so it
/// never reads as success unless it equals `0`.
fn read_code(fields: &Map<String, Value>) -> Result<i64, &'static str> {
    match fields.get("code") {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(code_from_float))
            .ok_or("`code` is not a number"),
        Some(_) => Err("`code` is not a number"),
        None => Err("missing `code`"),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn code_from_float(code: f64) -> i64 {
    if code > 0.0 {
        code.ceil() as i64
    } else if code < 0.0 {
        code.floor() as i64
    } else {
        SUCCESS_CODE
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;

    #[test]
    fn success_envelope() {
        let envelope = parse_envelope(br#"{"code":0,"msg":"ok","data":{"x":1}}"#).expect("parse");

        check!(envelope.is_success());
        check!(envelope.msg == "ok");
        check!(envelope.data == json!({"x": 1}));
    }

    #[test]
    fn business_envelope() {
        let envelope =
            parse_envelope(br#"{"code":40001,"msg":"insufficient balance","data":null}"#)
                .expect("parse");

        check!(!envelope.is_success());
        check!(envelope.code == 40001);
        check!(envelope.msg == "insufficient balance");
        check!(envelope.data.is_null());
    }

    #[test]
    fn invalid_json_keeps_raw_text() {
        let_assert!(Err(err) = parse_envelope(b"not json"));
        let_assert!(EnvelopeError::InvalidJson { raw, .. } = &err);
        check!(raw == "not json");
        check!(err.to_string().starts_with("invalid JSON: "));
    }

    #[test]
    fn array_is_not_an_envelope() {
        let_assert!(Err(err) = parse_envelope(b"[1,2]"));
        insta::assert_snapshot!(err.to_string(), @"not a valid envelope: expected a JSON object");
        check!(err.raw() == "[1,2]");
    }

    #[test]
    fn shape_violations() {
        let cases: [(&[u8], &str); 4] = [
            (br#"{"msg":"ok"}"#, "missing `code`"),
            (br#"{"code":"0","msg":"ok"}"#, "`code` is not a number"),
            (br#"{"code":0}"#, "missing `msg`"),
            (br#"{"code":0,"msg":7}"#, "`msg` is not a string"),
        ];

        for (body, expected) in cases {
            let_assert!(Err(EnvelopeError::NotAnEnvelope { reason, .. }) = parse_envelope(body));
            check!(reason == expected);
        }
    }

    #[test]
    fn float_codes_are_numeric() {
        let envelope = parse_envelope(br#"{"code":0.0,"msg":"ok","data":1}"#).expect("parse");
        check!(envelope.is_success());
        check!(envelope.data == json!(1));

        let envelope =
            parse_envelope(br#"{"code":40001.0,"msg":"insufficient balance"}"#).expect("parse");
        check!(envelope.code == 40001);

        let envelope = parse_envelope(br#"{"code":0.5,"msg":"odd"}"#).expect("parse");
        check!(!envelope.is_success());
        check!(envelope.code == 1);

        let envelope = parse_envelope(br#"{"code":-1.5,"msg":"odd"}"#).expect("parse");
        check!(envelope.code == -2);
    }

    #[test]
    fn decode_typed_payload() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Point {
            x: i32,
        }

        let envelope = parse_envelope(br#"{"code":0,"msg":"ok","data":{"x":1}}"#)
            .expect("parse")
            .decode::<Point>()
            .expect("decode");

        check!(envelope.data == Point { x: 1 });
    }

    #[test]
    fn decode_reports_path() {
        #[derive(Debug, Deserialize)]
        struct Point {
            #[allow(dead_code)]
            x: i32,
        }

        let err = parse_envelope(br#"{"code":0,"msg":"ok","data":{"x":"one"}}"#)
            .expect("parse")
            .decode::<Point>()
            .expect_err("mismatch");

        check!(err.path == "x");
    }

    #[test]
    fn data_survives_a_round_trip() {
        let body = br#"{"code":0,"msg":"ok","data":{"list":[{"id":"a/1","price":"0.50"}],"total":1,"extra":null}}"#;
        let envelope = parse_envelope(body).expect("parse");

        let reencoded = serde_json::to_vec(&envelope.data).expect("encode");
        let reparsed: Value = serde_json::from_slice(&reencoded).expect("decode");

        check!(reparsed == envelope.data);
    }

    #[test]
    fn envelope_map() {
        let envelope = Envelope {
            code: 0,
            msg: "ok".to_string(),
            data: 2,
        };
        let doubled = envelope.map(|n| n * 2);
        check!(doubled.into_data() == 4);
    }
}
