//! Pipeline orchestration.
//!
//! [`Pipeline::run`] walks `Init → Loaded → Translated → GeneratorStaged →
//! GeneratorRun → Relocated → Finalized → Done`, announcing each transition
//! before its work starts. The first error aborts the run. The work dir is
//! removed on every exit path; a destination written before the failure is
//! left as it is.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use adapters::{GeneratorToolchain, SchemaLoader};
use schema::{ResourceSpec, TypeName};
use translator::Translation;

use crate::generator_staging::{run_generator, stage_generator};
use crate::options::PipelineOptions;
use crate::package_setup::finalize_package;
use crate::pipeline_context::PipelineContext;
use crate::relocation::relocate;
use crate::stage::Stage;
use crate::{PipelineError, PipelineFailure, Result};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Type the package was generated for.
    pub type_name: TypeName,
    /// The resource spec handed to the generator.
    pub spec: ResourceSpec,
    /// The finalized package directory.
    pub package_dir: PathBuf,
}

/// A configured conversion run.
pub struct Pipeline<T: GeneratorToolchain> {
    options: PipelineOptions,
    toolchain: T,
    loader: SchemaLoader,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<T: GeneratorToolchain> Pipeline<T> {
    /// Pipeline for `options` driving the generator through `toolchain`.
    pub fn new(options: PipelineOptions, toolchain: T) -> Self {
        Self { options, toolchain, loader: SchemaLoader::new(), interrupt: None }
    }

    /// Use `loader` to fetch the schema.
    pub fn with_loader(mut self, loader: SchemaLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Stop before the next transition once `flag` is set.
    ///
    /// A transition already under way runs to completion.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Run parameters.
    pub fn options(&self) -> &PipelineOptions { &self.options }

    /// The generator toolchain.
    pub fn toolchain(&self) -> &T { &self.toolchain }

    /// Run every stage through to `Done`.
    pub async fn run(&self) -> std::result::Result<RunReport, PipelineFailure> {
        let mut ctx = self.create_context()?;
        let outcome = self.drive(&mut ctx).await;
        self.finish(ctx, outcome)
    }

    /// Stop after `Translated`; the generator is never touched.
    pub async fn translate_only(&self) -> std::result::Result<Translation, PipelineFailure> {
        let mut ctx = self.create_context()?;
        let outcome = self.load_and_translate(&mut ctx).await;
        self.finish(ctx, outcome)
    }

    async fn drive(&self, ctx: &mut PipelineContext) -> Result<RunReport> {
        let translation = self.load_and_translate(ctx).await?;
        let type_name = &translation.type_name;

        self.begin(ctx, "Staging generator tree")?;
        let layout =
            stage_generator(&self.toolchain, ctx.work_dir(), &self.options.generator, &translation)?;
        ctx.advance();

        self.begin(ctx, &format!("Generating code for {}", type_name.namespace_prefix()))?;
        run_generator(&self.toolchain, &layout, type_name)?;
        ctx.advance();

        self.begin(ctx, &format!("Copying package to {}", ctx.output_path().display()))?;
        let package_dir = relocate(&layout, type_name, ctx.output_path())?;
        ctx.advance();

        self.begin(ctx, &format!("Finalizing {}", package_dir.display()))?;
        finalize_package(&package_dir, type_name, &self.options.package)?;
        ctx.advance();

        logging::stage(Stage::Done.name(), &format!("Generated {}", package_dir.display()));
        ctx.advance();

        Ok(RunReport { type_name: translation.type_name, spec: translation.spec, package_dir })
    }

    async fn load_and_translate(&self, ctx: &mut PipelineContext) -> Result<Translation> {
        let location = &self.options.schema_location;
        self.begin(ctx, &format!("Loading schema from {}", location))?;
        let source = self.loader.load(location).await?;
        ctx.advance();

        self.begin(ctx, &format!("Translating {}", source.type_name))?;
        let translation = translator::translate_schema(&source)?;
        if let Ok(json) = translation.spec.to_json_pretty() {
            logging::debug("translator", &format!("Resulting spec:\n{}", json));
        }
        if let Some(path) = &self.options.spec_out {
            translation
                .spec
                .to_file(path)
                .map_err(|source| PipelineError::SpecOutput { path: path.clone(), source })?;
            logging::info("translator", &format!("Wrote resource spec to {}", path.display()));
        }
        ctx.advance();

        Ok(translation)
    }

    /// Announce the next transition, unless the run has been interrupted.
    fn begin(&self, ctx: &PipelineContext, msg: &str) -> Result<()> {
        if self.interrupt.as_ref().is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            return Err(PipelineError::Interrupted);
        }
        let target = ctx.stage().next().unwrap_or(Stage::Failed);
        logging::stage(target.name(), msg);
        Ok(())
    }

    fn create_context(&self) -> std::result::Result<PipelineContext, PipelineFailure> {
        let ctx = PipelineContext::create(self.options.work_root.as_deref(), &self.options.output_path)
            .map_err(|e| PipelineFailure::new(Stage::Init, PipelineError::WorkDir(e)))?;
        logging::debug("pipeline", &format!("Working directory {}", ctx.work_dir().display()));
        Ok(ctx)
    }

    fn finish<R>(
        &self,
        ctx: PipelineContext,
        outcome: Result<R>,
    ) -> std::result::Result<R, PipelineFailure> {
        let reached = ctx.stage();
        let work_dir = ctx.work_dir().to_path_buf();
        if let Err(e) = ctx.teardown() {
            logging::warn(
                "pipeline",
                &format!("Failed to remove working directory {}: {}", work_dir.display(), e),
            );
        }
        outcome.map_err(|error| PipelineFailure::new(reached, error))
    }
}
