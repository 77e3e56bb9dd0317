use serde_json::Value as JsonValue;
use snafu::{ResultExt, Snafu};

use crate::event::{Event, Record};

/// Errors raised while decoding a single input line.
#[derive(Debug, Snafu)]
pub enum DecodeError {
    #[snafu(display("Invalid JSON: {}", source))]
    InvalidJson { source: serde_json::Error },
    #[snafu(display("Expected a two element array of `[time, record]`."))]
    NotAPair,
    #[snafu(display("Invalid timestamp: {}", value))]
    InvalidTimestamp { value: JsonValue },
    #[snafu(display("Expected the record to be a JSON object, got: {}", value))]
    RecordNotAnObject { value: JsonValue },
}

/// Deserializes `[time, record]` pairs, one per line.
///
/// `time` is seconds since the Unix epoch. Fractional seconds are accepted and truncated, since
/// records are always written with second precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeserializer;

impl JsonDeserializer {
    pub const fn new() -> Self {
        Self
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<Event, DecodeError> {
        let json: JsonValue = serde_json::from_slice(bytes).context(InvalidJsonSnafu)?;

        let JsonValue::Array(mut pair) = json else {
            return Err(DecodeError::NotAPair);
        };
        if pair.len() != 2 {
            return Err(DecodeError::NotAPair);
        }
        let record = pair.pop().unwrap_or_default();
        let time = pair.pop().unwrap_or_default();

        let Some(timestamp) = parse_timestamp(&time) else {
            return Err(DecodeError::InvalidTimestamp { value: time });
        };
        let record = match record {
            JsonValue::Object(fields) => Record::from(fields),
            value => return Err(DecodeError::RecordNotAnObject { value }),
        };

        Ok(Event::new(timestamp, record))
    }
}

fn parse_timestamp(value: &JsonValue) -> Option<i64> {
    let number = value.as_number()?;
    if let Some(seconds) = number.as_i64() {
        return Some(seconds);
    }
    number
        .as_f64()
        .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;
    use crate::event::Value;

    fn parse(input: &str) -> Result<Event, DecodeError> {
        JsonDeserializer::new().parse(input.as_bytes())
    }

    #[test]
    fn parses_time_and_record() {
        let event = parse(r#"[1609499471, {"key0": "value0", "measure": 1000, "empty": null}]"#)
            .unwrap();

        assert_eq!(event.timestamp, 1609499471);
        let fields = event.record.iter().collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                ("key0", &Value::from("value0")),
                ("measure", &Value::Integer(1000)),
                ("empty", &Value::Null),
            ]
        );
    }

    #[test]
    fn keeps_field_order_from_input() {
        let event = parse(r#"[0, {"z": "1", "a": "2", "m": "3"}]"#).unwrap();
        let keys = event.record.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn truncates_fractional_seconds() {
        let event = parse(r#"[1609499471.987, {"k": "v"}]"#).unwrap();
        assert_eq!(event.timestamp, 1609499471);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(parse("not json"), Err(DecodeError::InvalidJson { .. })));
        assert!(matches!(parse(r#"{"k": "v"}"#), Err(DecodeError::NotAPair)));
        assert!(matches!(parse(r#"[1, {}, 2]"#), Err(DecodeError::NotAPair)));
        assert!(matches!(
            parse(r#"["yesterday", {"k": "v"}]"#),
            Err(DecodeError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            parse(r#"[1, "k=v"]"#),
            Err(DecodeError::RecordNotAnObject { .. })
        ));
    }
}
