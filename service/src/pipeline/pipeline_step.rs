use crate::error::Error;

/// The action to take after a step completes.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Continue to the next step
    Continue,
    /// Skip all remaining steps (successful early exit)
    Skip,
    /// Abort the pipeline with an error
    Abort(Error),
}

/// A single named stage of a pipeline over context `T`.
///
/// Steps read their inputs from the context and write their results back to it.
/// Recoverable problems are recorded on the context and followed by `Continue`;
/// only conditions that must stop the whole run return `Abort`.
///
/// ```ignore
/// struct RequireVideoStep;
///
/// #[async_trait::async_trait]
/// impl PipelineStep<DeletionContext> for RequireVideoStep {
///     fn name(&self) -> &'static str {
///         "require_video"
///     }
///
///     async fn execute(&self, context: &mut DeletionContext) -> StepAction {
///         match context.video {
///             Some(_) => StepAction::Continue,
///             None => StepAction::Abort(Error::NotFound(context.video_identifier.clone())),
///         }
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait PipelineStep<T>: Send + Sync {
    /// Returns the name of this step for logging and debugging.
    fn name(&self) -> &'static str;

    /// Steps returning `false` are passed over without affecting the pipeline flow.
    fn should_execute(&self, _context: &T) -> bool {
        true
    }

    async fn execute(&self, context: &mut T) -> StepAction;
}
