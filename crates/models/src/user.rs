use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Fields every create/update payload must carry, in check order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "username",
    "password",
    "admin",
    "name",
    "date_of_birth",
    "email",
    "roles",
    "courses",
];

/// A stored user record. Field order here is the on-disk field order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: ObjectId,
    pub username: String,
    pub password: String,
    pub admin: bool,
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub roles: Vec<String>,
    pub courses: Vec<String>,
}

/// Validated create/update payload: the eight user fields without identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub username: String,
    pub password: String,
    pub admin: bool,
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub roles: Vec<String>,
    pub courses: Vec<String>,
}

impl UserInput {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ModelError::InvalidJson)?;
        Self::from_value(&value)
    }

    /// Check a JSON payload and extract the eight fields. Checks run in a fixed
    /// order and stop at the first failure; unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let obj = value.as_object().ok_or(ModelError::NotAnObject)?;

        if let Some(missing) = REQUIRED_FIELDS.iter().copied().find(|f| !obj.contains_key(*f)) {
            return Err(ModelError::MissingField(missing));
        }

        let admin = obj["admin"].as_bool().ok_or(ModelError::NotBoolean("admin"))?;
        let roles = string_list(obj, "roles")?;
        let courses = string_list(obj, "courses")?;

        Ok(Self {
            username: string_field(obj, "username")?,
            password: string_field(obj, "password")?,
            admin,
            name: string_field(obj, "name")?,
            date_of_birth: string_field(obj, "date_of_birth")?,
            email: string_field(obj, "email")?,
            roles,
            courses,
        })
    }
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, ModelError> {
    obj[field].as_str().map(str::to_owned).ok_or(ModelError::NotString(field))
}

fn string_list(obj: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, ModelError> {
    let items = obj[field].as_array().ok_or(ModelError::NotStringList(field))?;
    items
        .iter()
        .map(|v| v.as_str().map(str::to_owned).ok_or(ModelError::NotStringList(field)))
        .collect()
}

impl User {
    /// Build a new record with a freshly generated identifier.
    pub fn create(input: UserInput) -> Self {
        Self::with_id(ObjectId::new(), input)
    }

    pub fn with_id(id: ObjectId, input: UserInput) -> Self {
        Self {
            id,
            username: input.username,
            password: input.password,
            admin: input.admin,
            name: input.name,
            date_of_birth: input.date_of_birth,
            email: input.email,
            roles: input.roles,
            courses: input.courses,
        }
    }

    /// Replace every field except the identifier.
    pub fn apply(&mut self, input: UserInput) {
        *self = Self::with_id(self.id, input);
    }
}
