//! Generation stage adapters.

mod service;
mod template;
mod templates;

pub use service::{DEFAULT_AUTH_METHOD, PrebuiltServiceStage};
pub use template::PackageTemplateStage;

use std::sync::Arc;

use ehrgen_core::{
    application::{ApplicationError, StageRegistry, ports::Filesystem},
    domain::StageKind,
    error::EhrGenError,
};

/// Register the built-in stages, both writing through `fs`.
pub fn register_builtin_stages(registry: &mut StageRegistry, fs: Arc<dyn Filesystem>) {
    let template_fs = Arc::clone(&fs);
    registry.register_template(move || Box::new(PackageTemplateStage::new(Arc::clone(&template_fs))));
    registry.register_service(move || Box::new(PrebuiltServiceStage::new(Arc::clone(&fs))));
}

fn not_configured(stage: StageKind) -> EhrGenError {
    ApplicationError::StageExecution {
        stage,
        reason: "stage executed before it was configured".into(),
    }
    .into()
}

fn serialization_failure(stage: StageKind, e: impl std::fmt::Display) -> EhrGenError {
    ApplicationError::StageExecution {
        stage,
        reason: format!("Failed to serialize output: {e}"),
    }
    .into()
}
