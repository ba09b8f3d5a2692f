use super::pipeline_step::{PipelineStep, StepAction};
use crate::error::Error;

/// Runs a fixed sequence of steps over a shared, mutable context.
///
/// Each step's `should_execute()` decides whether it runs. The pipeline stops at the
/// first `Skip` (success) or `Abort` (error); otherwise every step runs in order.
pub struct Pipeline<T> {
    pub steps: Vec<Box<dyn PipelineStep<T>>>,
}

impl<T> Pipeline<T> {
    pub fn with_steps(steps: Vec<Box<dyn PipelineStep<T>>>) -> Self {
        Self { steps }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub async fn execute(&self, context: &mut T) -> Result<(), Error> {
        for step in &self.steps {
            if !step.should_execute(context) {
                tracing::info!("Step {} will be skipped based on context", step.name());
                continue;
            }

            tracing::info!("Executing step: {}", step.name());

            match step.execute(context).await {
                StepAction::Continue => continue,
                StepAction::Skip => {
                    tracing::info!("Step {} requested skip - stopping pipeline", step.name());
                    return Ok(());
                }
                StepAction::Abort(error) => {
                    tracing::error!("Step {} aborted the pipeline: {}", step.name(), error);
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace {
        visited: Vec<&'static str>,
        allow_optional: bool,
    }

    struct Record(&'static str, Option<StepAction>);

    #[async_trait::async_trait]
    impl PipelineStep<Trace> for Record {
        fn name(&self) -> &'static str {
            self.0
        }

        fn should_execute(&self, context: &Trace) -> bool {
            self.0 != "optional" || context.allow_optional
        }

        async fn execute(&self, context: &mut Trace) -> StepAction {
            context.visited.push(self.0);
            self.1.clone().unwrap_or(StepAction::Continue)
        }
    }

    #[async_std::test]
    async fn test_runs_steps_in_order_and_honours_should_execute() {
        let pipeline = Pipeline::with_steps(vec![
            Box::new(Record("first", None)),
            Box::new(Record("optional", None)),
            Box::new(Record("last", None)),
        ]);
        let mut trace = Trace::default();
        pipeline.execute(&mut trace).await.unwrap();
        assert_eq!(trace.visited, vec!["first", "last"]);
        assert_eq!(pipeline.step_names(), vec!["first", "optional", "last"]);
    }

    #[async_std::test]
    async fn test_skip_stops_successfully() {
        let pipeline = Pipeline::with_steps(vec![
            Box::new(Record("first", Some(StepAction::Skip))),
            Box::new(Record("last", None)),
        ]);
        let mut trace = Trace::default();
        assert!(pipeline.execute(&mut trace).await.is_ok());
        assert_eq!(trace.visited, vec!["first"]);
    }

    #[async_std::test]
    async fn test_abort_returns_error() {
        let error = Error::NotFound("video demo".to_string());
        let pipeline = Pipeline::with_steps(vec![
            Box::new(Record("first", Some(StepAction::Abort(error.clone())))),
            Box::new(Record("last", None)),
        ]);
        let mut trace = Trace {
            allow_optional: true,
            ..Default::default()
        };
        assert_eq!(pipeline.execute(&mut trace).await, Err(error));
        assert_eq!(trace.visited, vec!["first"]);
    }
}
