// Service Descriptor (produced by a schema loader, opaque to supervision)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Method signature as declared by the service schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub response_type: Option<String>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            request_type: None,
            response_type: None,
        }
    }

    pub fn with_types(mut self, request: impl Into<String>, response: impl Into<String>) -> Self {
        self.request_type = Some(request.into());
        self.response_type = Some(response.into());
        self
    }
}

/// Registered service identity and its declared methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
