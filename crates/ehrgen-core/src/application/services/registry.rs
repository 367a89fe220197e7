//! Stage Registry - compile-time lookup of the generation stages.
//!
//! Each [`StageKind`] has at most one factory. The orchestrator asks for a
//! fresh stage instance per run.

use crate::{
    application::{
        ApplicationError,
        ports::{ServiceStage, TemplateStage},
    },
    domain::StageKind,
    error::EhrGenResult,
};

type TemplateFactory = Box<dyn Fn() -> Box<TemplateStage> + Send + Sync>;
type ServiceFactory = Box<dyn Fn() -> Box<ServiceStage> + Send + Sync>;

/// Factories for the two pipeline stages.
#[derive(Default)]
pub struct StageRegistry {
    template: Option<TemplateFactory>,
    service: Option<ServiceFactory>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the template stage factory, replacing any previous one.
    pub fn register_template<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Box<TemplateStage> + Send + Sync + 'static,
    {
        self.template = Some(Box::new(factory));
        self
    }

    /// Register the service stage factory, replacing any previous one.
    pub fn register_service<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Box<ServiceStage> + Send + Sync + 'static,
    {
        self.service = Some(Box::new(factory));
        self
    }

    pub fn template_stage(&self) -> EhrGenResult<Box<TemplateStage>> {
        self.template
            .as_ref()
            .map(|factory| factory())
            .ok_or_else(|| not_registered(StageKind::Template).into())
    }

    pub fn service_stage(&self) -> EhrGenResult<Box<ServiceStage>> {
        self.service
            .as_ref()
            .map(|factory| factory())
            .ok_or_else(|| not_registered(StageKind::Service).into())
    }
}

impl std::fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageRegistry")
            .field("template", &self.template.is_some())
            .field("service", &self.service.is_some())
            .finish()
    }
}

fn not_registered(stage: StageKind) -> ApplicationError {
    ApplicationError::ToolLoad {
        stage,
        reason: "no implementation registered".into(),
    }
}
