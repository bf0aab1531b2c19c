//! The publishing pipeline: an ordered list of steps over the site model.

use std::time::Instant;

use crate::context::PublishContext;
use crate::error::PublishError;
use crate::model::SiteModel;
use crate::site::SiteDescriptor;

/// Progress of a pipeline run. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Idle,
    Ingested,
    Highlighted,
    ResourcesCopied,
    Rendered,
    FeedEmitted,
    SitemapEmitted,
    Done,
}

/// Observable state of a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    At(Stage),
    Failed {
        /// Last stage reached before the failure
        stage: Stage,
        step: &'static str,
        error: String,
    },
}

/// One stage of the publishing sequence.
pub trait Step {
    /// Name used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Stage the pipeline reaches once this step succeeds.
    fn stage(&self) -> Stage;

    /// Configuration checks, run for every step before any I/O.
    fn validate(&self, _site: &SiteDescriptor) -> Result<(), PublishError> {
        Ok(())
    }

    /// Non-fatal configuration warnings.
    fn lints(&self, _site: &SiteDescriptor) -> Vec<String> {
        Vec::new()
    }

    /// Transform the model, possibly writing output files.
    fn apply(&self, ctx: &PublishContext, model: SiteModel) -> Result<SiteModel, PublishError>;
}

/// An ordered sequence of steps.
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(steps: Vec<Box<dyn Step>>) -> Self {
        Self {
            steps,
            state: PipelineState::At(Stage::Idle),
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Collect configuration warnings from every step.
    pub fn lints(&self, site: &SiteDescriptor) -> Vec<String> {
        self.steps.iter().flat_map(|s| s.lints(site)).collect()
    }

    /// Check layout, step order and per-step configuration.
    pub fn validate(&self, ctx: &PublishContext) -> Result<(), PublishError> {
        ctx.layout().validate()?;

        let mut previous: Option<&dyn Step> = None;
        for step in &self.steps {
            if let Some(before) = previous {
                if step.stage() < before.stage() {
                    return Err(PublishError::config(format!(
                        "step '{}' ({:?}) cannot run after '{}' ({:?})",
                        step.name(),
                        step.stage(),
                        before.name(),
                        before.stage()
                    )));
                }
            }
            step.validate(ctx.site())?;
            previous = Some(step.as_ref());
        }

        Ok(())
    }

    /// Run every step in order.
    ///
    /// The output directory is cleared once validation passes. The first
    /// failing step stops the run and its error is returned.
    pub fn run(&mut self, ctx: &PublishContext) -> Result<SiteModel, PublishError> {
        let start = Instant::now();
        self.state = PipelineState::At(Stage::Idle);

        if let Err(e) = self.validate(ctx) {
            self.state = PipelineState::Failed {
                stage: Stage::Idle,
                step: "validate",
                error: e.to_string(),
            };
            return Err(e);
        }

        for lint in self.lints(ctx.site()) {
            tracing::warn!("{}", lint);
        }

        let writer = ctx.output();
        if let Err(e) = writer.reset() {
            self.state = PipelineState::Failed {
                stage: Stage::Idle,
                step: "reset-output",
                error: e.to_string(),
            };
            return Err(e);
        }

        let mut model = SiteModel::default();
        let mut stage = Stage::Idle;

        for step in &self.steps {
            tracing::debug!(step = step.name(), "Running step");

            match step.apply(ctx, model) {
                Ok(next) => {
                    model = next;
                    stage = step.stage();
                    self.state = PipelineState::At(stage);
                }
                Err(e) => {
                    tracing::error!(step = step.name(), ?stage, "Publishing failed: {}", e);
                    self.state = PipelineState::Failed {
                        stage,
                        step: step.name(),
                        error: e.to_string(),
                    };
                    return Err(e);
                }
            }
        }

        self.state = PipelineState::At(Stage::Done);

        tracing::info!(
            "Published {} pages to {} in {}ms",
            model.rendered_pages.len(),
            writer.root().display(),
            start.elapsed().as_millis()
        );

        Ok(model)
    }
}

/// Run `steps` once against `ctx`.
pub fn publish(ctx: &PublishContext, steps: Vec<Box<dyn Step>>) -> Result<SiteModel, PublishError> {
    Pipeline::new(steps).run(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    use tempfile::tempdir;

    use crate::context::ProjectLayout;

    struct Probe {
        name: &'static str,
        stage: Stage,
        fail: bool,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Step for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn stage(&self) -> Stage {
            self.stage
        }

        fn lints(&self, _site: &SiteDescriptor) -> Vec<String> {
            vec![format!("lint from {}", self.name)]
        }

        fn apply(&self, ctx: &PublishContext, model: SiteModel) -> Result<SiteModel, PublishError> {
            self.log.borrow_mut().push(self.name);
            if self.fail {
                return Err(PublishError::plugin(self.name, "boom"));
            }
            ctx.output().write(format!("{}.txt", self.name), self.name)?;
            Ok(model)
        }
    }

    fn probe(
        name: &'static str,
        stage: Stage,
        fail: bool,
        log: &Rc<RefCell<Vec<&'static str>>>,
    ) -> Box<dyn Step> {
        Box::new(Probe {
            name,
            stage,
            fail,
            log: Rc::clone(log),
        })
    }

    fn context(root: &std::path::Path) -> PublishContext {
        let site = SiteDescriptor::builder("https://example.com", "Blog")
            .description("Test site")
            .section("posts")
            .build()
            .unwrap();
        PublishContext::new(site, ProjectLayout::at(root))
    }

    #[test]
    fn runs_steps_in_declared_order() {
        let temp = tempdir().unwrap();
        let ctx = context(temp.path());
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut pipeline = Pipeline::new(vec![
            probe("ingest", Stage::Ingested, false, &log),
            probe("render", Stage::Rendered, false, &log),
            probe("sitemap", Stage::SitemapEmitted, false, &log),
        ]);
        pipeline.run(&ctx).unwrap();

        assert_eq!(*log.borrow(), vec!["ingest", "render", "sitemap"]);
        assert_eq!(pipeline.state(), &PipelineState::At(Stage::Done));
    }

    #[test]
    fn first_failure_aborts_remaining_steps() {
        let temp = tempdir().unwrap();
        let ctx = context(temp.path());
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut pipeline = Pipeline::new(vec![
            probe("ingest", Stage::Ingested, false, &log),
            probe("highlight", Stage::Highlighted, true, &log),
            probe("render", Stage::Rendered, false, &log),
        ]);
        let result = pipeline.run(&ctx);

        assert!(matches!(result, Err(PublishError::Plugin { .. })));
        assert_eq!(*log.borrow(), vec!["ingest", "highlight"]);
        assert!(matches!(
            pipeline.state(),
            PipelineState::Failed { stage: Stage::Ingested, step: "highlight", .. }
        ));
        // Output written before the failure is kept.
        assert!(temp.path().join("output/ingest.txt").exists());
        assert!(!temp.path().join("output/render.txt").exists());
    }

    #[test]
    fn rejects_backwards_step_order_before_io() {
        let temp = tempdir().unwrap();
        let ctx = context(temp.path());
        let log = Rc::new(RefCell::new(Vec::new()));
        fs::create_dir_all(temp.path().join("output")).unwrap();
        fs::write(temp.path().join("output/keep.txt"), "x").unwrap();

        let mut pipeline = Pipeline::new(vec![
            probe("render", Stage::Rendered, false, &log),
            probe("ingest", Stage::Ingested, false, &log),
        ]);
        let result = pipeline.run(&ctx);

        assert!(matches!(result, Err(PublishError::Configuration(_))));
        assert!(log.borrow().is_empty());
        assert!(temp.path().join("output/keep.txt").exists());
        assert!(matches!(
            pipeline.state(),
            PipelineState::Failed { stage: Stage::Idle, .. }
        ));
    }

    #[test]
    fn clears_stale_output_before_running() {
        let temp = tempdir().unwrap();
        let ctx = context(temp.path());
        let log = Rc::new(RefCell::new(Vec::new()));
        fs::create_dir_all(temp.path().join("output")).unwrap();
        fs::write(temp.path().join("output/stale.html"), "old").unwrap();

        publish(&ctx, vec![probe("ingest", Stage::Ingested, false, &log)]).unwrap();

        assert!(!temp.path().join("output/stale.html").exists());
        assert!(temp.path().join("output/ingest.txt").exists());
    }

    #[test]
    fn collects_lints_from_every_step() {
        let temp = tempdir().unwrap();
        let ctx = context(temp.path());
        let log = Rc::new(RefCell::new(Vec::new()));

        let pipeline = Pipeline::new(vec![
            probe("a", Stage::Ingested, false, &log),
            probe("b", Stage::Rendered, false, &log),
        ]);

        assert_eq!(
            pipeline.lints(ctx.site()),
            vec!["lint from a".to_string(), "lint from b".to_string()]
        );
    }
}
