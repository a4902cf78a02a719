use crate::domain::FunctionCall;
use crate::error::AskError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FIELD_LOOKUP_FUNCTION: &str = "list_fields_for_schema_types";
pub const TYPE_NAME_PARAMETER: &str = "typeName";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, ParameterSpec>,
    pub required: Vec<String>,
}

/// Declaration of a callable surface offered to the completion model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCallSpec {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

/// The local operations the model may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    FieldLookup,
}

/// A decoded, ready-to-run capability request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityInvocation {
    FieldLookup { type_name: String },
}

#[derive(Debug, Deserialize)]
struct FieldLookupArgs {
    #[serde(rename = "typeName")]
    type_name: String,
}

impl Capability {
    pub fn all() -> &'static [Capability] {
        &[Capability::FieldLookup]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Capability::FieldLookup => FIELD_LOOKUP_FUNCTION,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|cap| cap.name() == name)
    }

    pub fn spec(&self) -> FunctionCallSpec {
        match self {
            Capability::FieldLookup => {
                let mut properties = BTreeMap::new();
                properties.insert(
                    TYPE_NAME_PARAMETER.to_string(),
                    ParameterSpec {
                        kind: "string".to_string(),
                        description: "the GraphQL type to inspect for linked fields".to_string(),
                    },
                );
                FunctionCallSpec {
                    name: self.name().to_string(),
                    description: "introspect the graphql schema to determine reference fields"
                        .to_string(),
                    parameters: ParameterSchema {
                        kind: "object".to_string(),
                        properties,
                        required: vec![TYPE_NAME_PARAMETER.to_string()],
                    },
                }
            }
        }
    }

    /// Matches the model's call against the fixed capability set and decodes its arguments.
    pub fn decode(call: &FunctionCall) -> Result<CapabilityInvocation, AskError> {
        let capability = Self::from_name(&call.name)
            .ok_or_else(|| AskError::UnknownCapability(call.name.clone()))?;

        match capability {
            Capability::FieldLookup => {
                let args: FieldLookupArgs =
                    serde_json::from_str(&call.arguments).map_err(|err| {
                        AskError::FunctionArguments {
                            function: call.name.clone(),
                            detail: err.to_string(),
                        }
                    })?;
                let type_name = args.type_name.trim();
                if type_name.is_empty() {
                    return Err(AskError::FunctionArguments {
                        function: call.name.clone(),
                        detail: format!("`{}` vide", TYPE_NAME_PARAMETER),
                    });
                }
                Ok(CapabilityInvocation::FieldLookup {
                    type_name: type_name.to_string(),
                })
            }
        }
    }
}
