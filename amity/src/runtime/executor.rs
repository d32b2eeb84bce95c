use redis::{Script, aio::ConnectionLike};
use serde_json::Value;

use crate::errors::StoreError;

/// Runs one mutation script and decodes its JSON reply.
///
/// Scripts answer either with the updated document or with an object carrying
/// an `error` code, which is translated into a `StoreError` here.
pub struct ScriptExecutor<'a, C>
where
    C: ConnectionLike + Send,
{
    connection: &'a mut C,
}

impl<'a, C> ScriptExecutor<'a, C>
where
    C: ConnectionLike + Send,
{
    pub fn new(connection: &'a mut C) -> Self {
        Self { connection }
    }

    pub async fn run(&mut self, script: &Script, keys: &[String], args: &[String]) -> Result<Value, StoreError> {
        let mut invocation = script.prepare_invoke();
        for key in keys {
            invocation.key(key);
        }
        for arg in args {
            invocation.arg(arg);
        }
        let raw: String = invocation.invoke_async(&mut *self.connection).await?;
        decode_reply(&raw)
    }
}

pub(crate) fn decode_reply(raw: &str) -> Result<Value, StoreError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| StoreError::Corrupt {
        message: format!("failed to parse lua response: {err}").into(),
    })?;

    let Some(error) = value.get("error") else {
        return Ok(value);
    };
    let Some(code) = error.as_str() else {
        return Err(StoreError::Corrupt {
            message: "lua_error".into(),
        });
    };
    let text = |field: &str| {
        value
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default()
    };
    let number = |field: &str| value.get(field).and_then(Value::as_u64).unwrap_or_default();

    Err(match code {
        "not_found" => StoreError::NotFound { id: text("id") },
        "version_conflict" => StoreError::VersionConflict {
            expected: number("expected"),
            actual: number("actual"),
        },
        "duplicate_email" => StoreError::DuplicateEmail { email: text("email") },
        other => StoreError::Corrupt {
            message: other.to_string().into(),
        },
    })
}
