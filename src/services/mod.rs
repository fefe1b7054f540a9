//! Servicios de coordinación entre componentes

pub mod workflow_orchestrator;

pub use workflow_orchestrator::{StepFailure, WorkflowOrchestrator, WorkflowOutcome};
