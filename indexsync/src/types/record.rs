use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One opaque unit of data moved by the pipeline.
///
/// A [`Record`] is a JSON object carrying a unique string identifier under
/// the `objectID` key; all other fields are uninterpreted. The identifier is
/// the upsert key at the destination, so two records sharing an id overwrite
/// each other in write order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    /// Creates a record with the given identifier and no other fields.
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            fields: Map::new(),
        }
    }

    /// Adds or replaces a field and returns the modified record.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the unique identifier of this record.
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Returns the fields of this record, excluding the identifier.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
