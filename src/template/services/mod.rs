//! Service layer for template registration and identifier assignment.

mod identifier;
mod registry;

pub use identifier::assign_task_identifier;
pub use registry::{
    RegisterTemplateRequest, TaskTemplateService, TemplateRegistryError, TemplateRegistryResult,
};
