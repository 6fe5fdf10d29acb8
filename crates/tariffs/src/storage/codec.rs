//! Generic conversion between `serde` types and DynamoDB attribute values.
//!
//! Payloads are first turned into a `serde_json::Value` and then mapped
//! structurally: objects become `M`, arrays `L`, strings `S`, numbers `N`,
//! booleans `BOOL` and null `NULL`. Field names are preserved as-is, so the
//! stored shape is exactly the serde shape of the domain type.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use tariffs_core::storage::{Envelope, RepositoryError};

use super::client::{Item, TableSchema};

/// Attribute holding the encoded domain payload.
pub const DATA_ATTRIBUTE: &str = "Data";

/// Errors raised while encoding or decoding stored items.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("missing attribute '{0}'")]
    MissingAttribute(String),
    #[error("attribute '{0}' is not a string")]
    NotAString(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unsupported attribute type: {0}")]
    Unsupported(String),
}

impl From<CodecError> for RepositoryError {
    fn from(err: CodecError) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

/// Encodes any serializable value as a single attribute value.
pub fn to_attribute<T: Serialize>(value: &T) -> Result<AttributeValue, CodecError> {
    let json = serde_json::to_value(value).map_err(CodecError::Encode)?;
    Ok(json_to_attribute(json))
}

/// Decodes a single attribute value into `T`.
pub fn from_attribute<T: DeserializeOwned>(value: &AttributeValue) -> Result<T, CodecError> {
    let json = attribute_to_json(value)?;
    serde_json::from_value(json).map_err(CodecError::Decode)
}

/// Encodes an envelope as a full item: both key attributes plus `Data`.
pub fn encode_envelope<T: Serialize>(
    schema: &TableSchema,
    envelope: &Envelope<T>,
) -> Result<Item, CodecError> {
    Ok(HashMap::from([
        (
            schema.partition_key.clone(),
            AttributeValue::S(envelope.partition_key.clone()),
        ),
        (
            schema.sort_key.clone(),
            AttributeValue::S(envelope.sort_key.clone()),
        ),
        (DATA_ATTRIBUTE.to_string(), to_attribute(&envelope.data)?),
    ]))
}

/// Decodes a full item into an envelope.
pub fn decode_envelope<T: DeserializeOwned>(
    schema: &TableSchema,
    item: &Item,
) -> Result<Envelope<T>, CodecError> {
    let data = item
        .get(DATA_ATTRIBUTE)
        .ok_or_else(|| CodecError::MissingAttribute(DATA_ATTRIBUTE.to_string()))?;

    Ok(Envelope {
        partition_key: get_string(item, &schema.partition_key)?,
        sort_key: get_string(item, &schema.sort_key)?,
        data: from_attribute(data)?,
    })
}

fn get_string(item: &Item, name: &str) -> Result<String, CodecError> {
    match item.get(name) {
        Some(AttributeValue::S(s)) => Ok(s.clone()),
        Some(_) => Err(CodecError::NotAString(name.to_string())),
        None => Err(CodecError::MissingAttribute(name.to_string())),
    }
}

fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(json_to_attribute).collect())
        }
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(k, v)| (k, json_to_attribute(v)))
                .collect(),
        ),
    }
}

fn attribute_to_json(value: &AttributeValue) -> Result<Value, CodecError> {
    Ok(match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), attribute_to_json(v)?)))
                .collect::<Result<Map<_, _>, CodecError>>()?,
        ),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        other => return Err(CodecError::Unsupported(format!("{other:?}"))),
    })
}

fn parse_number(raw: &str) -> Result<Number, CodecError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| CodecError::InvalidNumber(raw.to_string()))
}
