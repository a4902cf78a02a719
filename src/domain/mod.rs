mod capability;
mod message;

pub use capability::{
    Capability, CapabilityInvocation, FunctionCallSpec, ParameterSchema, ParameterSpec,
    FIELD_LOOKUP_FUNCTION, TYPE_NAME_PARAMETER,
};
pub use message::{FunctionCall, Message, Role};
