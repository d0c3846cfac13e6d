//! Pending task-creation operations.
//!
//! A [`TaskBatch`] is an ordered, append-only list. The platform executes
//! operations in the order they were submitted, so insertion order is kept
//! all the way into the serialized `ops` array.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result, require_non_empty};

/// Operation kind. This client only creates.
const OP_TYPE: &str = "create";
/// Object kind the operation applies to.
const OP_OBJ: &str = "task";

/// One pending `create task` operation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOperation {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "type")]
    kind: &'static str,
    obj: &'static str,
    conv_id: String,
    data: Map<String, Value>,
}

impl TaskOperation {
    /// Build a `create task` operation, validating its inputs.
    ///
    /// `data` must be a JSON object; `None` means `{}`.
    pub fn create(
        reference: impl Into<String>,
        conv_id: impl Into<String>,
        data: Option<Value>,
    ) -> Result<Self> {
        let reference = reference.into();
        let conv_id = conv_id.into();
        require_non_empty("ref", &reference)?;
        require_non_empty("conv_id", &conv_id)?;

        let data = match data {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(Error::validation(
                    "data",
                    format!("expected a JSON object, got {}", json_kind(&other)),
                ));
            }
        };

        Ok(Self {
            reference,
            kind: OP_TYPE,
            obj: OP_OBJ,
            conv_id,
            data,
        })
    }

    /// Caller-supplied correlation id.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    pub fn obj(&self) -> &str {
        self.obj
    }

    /// Target process id.
    pub fn conv_id(&self) -> &str {
        &self.conv_id
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The request body shape: `{"ops": [...]}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Envelope<'a> {
    pub ops: &'a [TaskOperation],
}

/// Ordered accumulator of pending operations.
///
/// Mutation needs `&mut self`; share one batch across tasks only behind a
/// lock.
#[derive(Debug, Clone, Default)]
pub struct TaskBatch {
    ops: Vec<TaskOperation>,
}

impl TaskBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `create task` operation at the end of the batch.
    ///
    /// Duplicate refs are kept as-is; idempotency is the platform's job.
    pub fn append(
        &mut self,
        reference: impl Into<String>,
        conv_id: impl Into<String>,
        data: Option<Value>,
    ) -> Result<()> {
        let op = TaskOperation::create(reference, conv_id, data)?;
        self.ops.push(op);
        Ok(())
    }

    /// View the batch as a request envelope.
    pub fn serialize(&self) -> Envelope<'_> {
        Envelope { ops: &self.ops }
    }

    /// Render the envelope as the JSON request body.
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    /// Drop every pending operation. No-op on an empty batch.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn operations(&self) -> &[TaskOperation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
