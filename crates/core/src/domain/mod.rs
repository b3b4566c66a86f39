// Domain Layer - Supervision Vocabulary

pub mod call;
pub mod descriptor;

pub use call::{Call, Callback, Completion};
pub use descriptor::{MethodDescriptor, ServiceDescriptor};
