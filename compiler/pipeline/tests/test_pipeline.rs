//! End-to-end pipeline runs against a fake generator toolchain.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use adapters::{
    GeneratorLayout, GeneratorToolchain, GeneratorTree, LoadError, ToolExit, ToolchainError,
    ToolchainResult, BUMP_CFNSPEC_SCRIPT, CFN2TS_BIN,
};
use location::SchemaLocation;
use pipeline::{Pipeline, PipelineError, PipelineOptions, Stage};
use tempfile::TempDir;
use walkdir::WalkDir;

const WIDGET_SCHEMA: &str = r#"{
    "typeName": "Org::Svc::Widget",
    "properties": {"name": {"type": "string"}, "count": {"type": "integer"}},
    "required": ["name"],
    "createOnlyProperties": ["/properties/name"]
}"#;

const WIDGET_SPEC: &str = r#"{"ResourceTypes":{"Org::Svc::Widget":{"Attributes":{"name":{"PrimitiveType":"String"},"count":{"PrimitiveType":"Integer"}},"Properties":{"name":{"PrimitiveType":"String","Required":true,"UpdateType":"Immutable"},"count":{"PrimitiveType":"Integer","Required":false,"UpdateType":"Mutable"}}}}}"#;

const GENSPEC_JS: &str = "const KNOWN_ORGS = ['AWS', 'Alexa'];\n";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

/// Materializes a skeletal CDK checkout and plays the generator's part.
struct FakeToolchain {
    genspec: String,
    fail_prepare: bool,
    bump_exit: i32,
    cfn2ts_exit: i32,
    scaffolding: Vec<&'static str>,
    layout: RefCell<Option<GeneratorLayout>>,
    prepared: RefCell<usize>,
    calls: RefCell<Vec<Invocation>>,
    merged_spec: RefCell<Option<String>>,
    patched_genspec: RefCell<Option<String>>,
}

impl Default for FakeToolchain {
    fn default() -> Self {
        Self {
            genspec: GENSPEC_JS.to_string(),
            fail_prepare: false,
            bump_exit: 0,
            cfn2ts_exit: 0,
            scaffolding: vec!["LICENSE", "NOTICE", "jest.config.js", ".eslintrc.js"],
            layout: RefCell::new(None),
            prepared: RefCell::new(0),
            calls: RefCell::new(Vec::new()),
            merged_spec: RefCell::new(None),
            patched_genspec: RefCell::new(None),
        }
    }
}

impl FakeToolchain {
    fn untouched(&self) -> bool { *self.prepared.borrow() == 0 && self.calls.borrow().is_empty() }

    fn programs(&self) -> Vec<String> { self.calls.borrow().iter().map(|c| c.program.clone()).collect() }

    /// What cfn2ts would emit for `--scope Org::Svc`.
    fn generate(&self, layout: &GeneratorLayout, scope: &str) -> std::io::Result<()> {
        let mut parts = scope.split("::");
        let org = parts.next().unwrap_or_default().to_lowercase();
        let svc = parts.next().unwrap_or_default().to_lowercase();

        let generated = layout.cfn2ts_dir().join("lib").join(format!("{}.generated.ts", svc));
        fs::write(&generated, format!("// generated for {}\nexport class CfnWidget {{}}\n", scope))?;

        let package = layout.packages_dir().join(format!("{}-{}", org, svc));
        fs::create_dir_all(package.join("lib"))?;
        fs::create_dir_all(package.join("test"))?;
        fs::write(package.join("lib/index.ts"), format!("export * from './{}.generated';\n", svc))?;
        fs::write(package.join("test").join(format!("{}.test.ts", svc)), "test('noop', () => {});\n")?;
        fs::write(package.join("README.md"), "# generated\n")?;
        for file in &self.scaffolding {
            fs::write(package.join(file), "scaffolding\n")?;
        }
        Ok(())
    }
}

impl GeneratorToolchain for FakeToolchain {
    fn prepare(&self, tree: &GeneratorTree) -> ToolchainResult<()> {
        *self.prepared.borrow_mut() += 1;
        if self.fail_prepare {
            return Err(ToolchainError::MissingProgram("yarn".to_string()));
        }
        let layout = &tree.layout;
        fs::create_dir_all(layout.cfn2ts_dir().join("lib"))?;
        fs::write(layout.genspec_path(), &self.genspec)?;
        fs::create_dir_all(layout.packages_dir().join("cfnspec").join("spec-source"))?;
        *self.layout.borrow_mut() = Some(layout.clone());
        Ok(())
    }

    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> ToolchainResult<ToolExit> {
        self.calls.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        });
        let layout = self.layout.borrow().clone().expect("run before prepare");

        match program {
            BUMP_CFNSPEC_SCRIPT => {
                *self.merged_spec.borrow_mut() = fs::read_to_string(layout.spec_source_path()).ok();
                *self.patched_genspec.borrow_mut() = fs::read_to_string(layout.genspec_path()).ok();
                Ok(ToolExit::from_code(self.bump_exit))
            }
            CFN2TS_BIN => {
                if self.cfn2ts_exit == 0 {
                    self.generate(&layout, args[1])?;
                }
                Ok(ToolExit::from_code(self.cfn2ts_exit))
            }
            other => panic!("unexpected program {}", other),
        }
    }
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("widget.json"), WIDGET_SCHEMA).expect("write schema");
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf { self.dir.path().join(rel) }

    fn options(&self, output: &str) -> PipelineOptions {
        let mut options =
            PipelineOptions::new(SchemaLocation::Local(self.path("widget.json")), self.path(output));
        options.work_root = Some(self.path("work"));
        options
    }

    fn work_root_is_empty(&self) -> bool {
        fs::read_dir(self.path("work")).map(|mut entries| entries.next().is_none()).unwrap_or(true)
    }
}

/// Relative path → contents of every file under `root`.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.expect("walk"))
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).expect("under root").to_path_buf();
            (rel, fs::read_to_string(e.path()).expect("read"))
        })
        .collect()
}

#[tokio::test]
async fn full_run_produces_a_finalized_package() {
    let sandbox = Sandbox::new();
    let pipeline = Pipeline::new(sandbox.options("out"), FakeToolchain::default());

    let report = pipeline.run().await.expect("run should succeed");
    let package = sandbox.path("out/org-svc-widget");
    assert_eq!(report.package_dir, package);
    assert_eq!(report.type_name.as_str(), "Org::Svc::Widget");

    let files: Vec<PathBuf> = snapshot(&package).into_keys().collect();
    assert_eq!(
        files,
        ["README.md", "lib/index.ts", "lib/svc.generated.ts", "package.json", "tsconfig.json"]
            .iter()
            .map(PathBuf::from)
            .collect::<Vec<_>>()
    );
    assert!(!package.join("test").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(package.join("package.json")).expect("manifest"))
            .expect("manifest json");
    assert_eq!(manifest["name"], "org-svc-widget");
    assert_eq!(manifest["version"], "0.1.0");
    assert_eq!(manifest["description"], "The CDK Construct Library for Org::Svc::Widget");
    assert_eq!(manifest["dependencies"]["@aws-cdk/core"], "^1.110.1");

    let generated = fs::read_to_string(package.join("lib/svc.generated.ts")).expect("generated");
    assert!(generated.starts_with("// generated for Org::Svc"));

    assert!(sandbox.work_root_is_empty(), "work dir must be removed");
}

#[tokio::test]
async fn generator_receives_spec_org_and_scope() {
    let sandbox = Sandbox::new();
    let pipeline = Pipeline::new(sandbox.options("out"), FakeToolchain::default());
    pipeline.run().await.expect("run should succeed");

    let fake = pipeline.toolchain();
    let merged: serde_json::Value =
        serde_json::from_str(fake.merged_spec.borrow().as_deref().expect("spec staged")).expect("json");
    let expected: serde_json::Value = serde_json::from_str(WIDGET_SPEC).expect("json");
    assert_eq!(merged, expected);

    assert_eq!(
        fake.patched_genspec.borrow().as_deref(),
        Some("const KNOWN_ORGS = ['AWS', 'Alexa', 'Org'];\n")
    );

    let calls = fake.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].program, BUMP_CFNSPEC_SCRIPT);
    assert!(calls[0].cwd.ends_with("aws-cdk"));
    assert_eq!(calls[1].program, CFN2TS_BIN);
    assert_eq!(calls[1].args, vec!["--scope".to_string(), "Org::Svc".to_string()]);
    assert!(calls[1].cwd.ends_with("aws-cdk/tools/cfn2ts"));
}

#[tokio::test]
async fn unreachable_schema_fails_from_init() {
    let sandbox = Sandbox::new();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("ephemeral port");
    let mut options = sandbox.options("out");
    options.schema_location = SchemaLocation::Remote(format!("http://127.0.0.1:{}/schema.json", port));

    let pipeline = Pipeline::new(options, FakeToolchain::default());
    let failure = pipeline.run().await.expect_err("run must fail");

    assert_eq!(failure.from, Stage::Init);
    assert_eq!(failure.attempted, Stage::Loaded);
    assert_eq!(failure.terminal_stage(), Stage::Failed);
    assert!(matches!(failure.error, PipelineError::Load(LoadError::Fetch { .. })), "{:?}", failure);
    assert!(pipeline.toolchain().untouched());
    assert!(sandbox.work_root_is_empty(), "work dir must be removed");
    assert!(!sandbox.path("out").exists());
}

#[tokio::test]
async fn generator_failure_stops_before_relocation() {
    let sandbox = Sandbox::new();
    let fake = FakeToolchain { cfn2ts_exit: 1, ..FakeToolchain::default() };
    let pipeline = Pipeline::new(sandbox.options("out"), fake);

    let failure = pipeline.run().await.expect_err("run must fail");
    assert_eq!(failure.from, Stage::GeneratorStaged);
    assert_eq!(failure.attempted, Stage::GeneratorRun);
    match &failure.error {
        PipelineError::Generator(ToolchainError::CommandFailed { command, exit, .. }) => {
            assert_eq!(command, "bin/cfn2ts --scope Org::Svc");
            assert_eq!(exit.code(), Some(1));
        }
        other => panic!("expected generator failure, got {:?}", other),
    }
    assert!(failure.to_string().starts_with("stage GeneratorRun failed"));
    assert!(!sandbox.path("out").exists(), "nothing may be relocated");
    assert!(sandbox.work_root_is_empty(), "work dir must be removed");
}

#[tokio::test]
async fn failing_merge_step_skips_code_generation() {
    let sandbox = Sandbox::new();
    let fake = FakeToolchain { bump_exit: 2, ..FakeToolchain::default() };
    let pipeline = Pipeline::new(sandbox.options("out"), fake);

    let failure = pipeline.run().await.expect_err("run must fail");
    assert_eq!(failure.attempted, Stage::GeneratorRun);
    assert_eq!(pipeline.toolchain().programs(), vec![BUMP_CFNSPEC_SCRIPT.to_string()]);
}

#[tokio::test]
async fn second_run_overwrites_instead_of_merging() {
    let sandbox = Sandbox::new();

    Pipeline::new(sandbox.options("out"), FakeToolchain::default())
        .run()
        .await
        .expect("first run");
    let package = sandbox.path("out/org-svc-widget");
    fs::write(package.join("stale.txt"), "left over").expect("write stale file");
    fs::write(package.join("README.md"), "edited").expect("edit readme");

    Pipeline::new(sandbox.options("out"), FakeToolchain::default())
        .run()
        .await
        .expect("second run");
    Pipeline::new(sandbox.options("fresh"), FakeToolchain::default())
        .run()
        .await
        .expect("fresh run");

    assert_eq!(snapshot(&package), snapshot(&sandbox.path("fresh/org-svc-widget")));
}

#[tokio::test]
async fn failed_preparation_is_a_staging_error() {
    let sandbox = Sandbox::new();
    let fake = FakeToolchain { fail_prepare: true, ..FakeToolchain::default() };
    let pipeline = Pipeline::new(sandbox.options("out"), fake);

    let failure = pipeline.run().await.expect_err("run must fail");
    assert_eq!(failure.from, Stage::Translated);
    assert_eq!(failure.attempted, Stage::GeneratorStaged);
    assert!(matches!(failure.error, PipelineError::Staging(_)), "{:?}", failure);
    assert!(pipeline.toolchain().calls.borrow().is_empty());
    assert!(sandbox.work_root_is_empty());
}

#[tokio::test]
async fn genspec_without_allow_list_is_a_staging_error() {
    let sandbox = Sandbox::new();
    let fake = FakeToolchain { genspec: "const KNOWN_ORGS = [];\n".to_string(), ..FakeToolchain::default() };
    let pipeline = Pipeline::new(sandbox.options("out"), fake);

    let failure = pipeline.run().await.expect_err("run must fail");
    assert_eq!(failure.attempted, Stage::GeneratorStaged);
    match &failure.error {
        PipelineError::Staging(msg) => assert!(msg.contains("'AWS', 'Alexa'"), "{}", msg),
        other => panic!("expected staging error, got {:?}", other),
    }
    assert!(pipeline.toolchain().calls.borrow().is_empty());
}

#[tokio::test]
async fn missing_scaffolding_fails_finalization_after_relocation() {
    let sandbox = Sandbox::new();
    let fake = FakeToolchain { scaffolding: vec!["LICENSE", "NOTICE"], ..FakeToolchain::default() };
    let pipeline = Pipeline::new(sandbox.options("out"), fake);

    let failure = pipeline.run().await.expect_err("run must fail");
    assert_eq!(failure.from, Stage::Relocated);
    assert_eq!(failure.attempted, Stage::Finalized);
    match &failure.error {
        PipelineError::Finalize(msg) => {
            assert!(msg.contains("jest.config.js") && msg.contains(".eslintrc.js"), "{}", msg)
        }
        other => panic!("expected finalize error, got {:?}", other),
    }
    // The destination is left partially populated.
    assert!(sandbox.path("out/org-svc-widget/lib/svc.generated.ts").is_file());
    assert!(sandbox.work_root_is_empty());
}

#[tokio::test]
async fn scoped_package_name_and_author() {
    let sandbox = Sandbox::new();
    let mut options = sandbox.options("out");
    options.package.npm_scope = Some("@acme".to_string());
    options.package.author = "Jane Doe".to_string();
    options.package.version = "2.0.0".to_string();

    let report = Pipeline::new(options, FakeToolchain::default()).run().await.expect("run");
    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(report.package_dir.join("package.json")).expect("manifest"),
    )
    .expect("manifest json");
    assert_eq!(manifest["name"], "@acme/org-svc-widget");
    assert_eq!(manifest["author"], "Jane Doe");
    assert_eq!(manifest["version"], "2.0.0");
    assert!(report.package_dir.ends_with("org-svc-widget"));
}

#[tokio::test]
async fn translate_only_never_touches_the_generator() {
    let sandbox = Sandbox::new();
    let mut options = sandbox.options("out");
    options.spec_out = Some(sandbox.path("spec/result.json"));

    let pipeline = Pipeline::new(options, FakeToolchain::default());
    let translation = pipeline.translate_only().await.expect("translation");

    assert_eq!(translation.type_name.as_str(), "Org::Svc::Widget");
    let written: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(sandbox.path("spec/result.json")).expect("spec written"),
    )
    .expect("json");
    let expected: serde_json::Value = serde_json::from_str(WIDGET_SPEC).expect("json");
    assert_eq!(written, expected);
    assert!(pipeline.toolchain().untouched());
    assert!(sandbox.work_root_is_empty());
}

#[tokio::test]
async fn malformed_schema_fails_from_loaded() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.path("widget.json"), r#"{"typeName": "Org::Widget", "properties": {}}"#)
        .expect("write schema");

    let pipeline = Pipeline::new(sandbox.options("out"), FakeToolchain::default());
    let failure = pipeline.run().await.expect_err("run must fail");
    assert_eq!(failure.from, Stage::Loaded);
    assert_eq!(failure.attempted, Stage::Translated);
    assert!(matches!(failure.error, PipelineError::Translate(_)), "{:?}", failure);
    assert!(pipeline.toolchain().untouched());
}

#[tokio::test]
async fn type_name_with_path_segments_never_reaches_relocation() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.path("victim")).expect("mkdir");
    fs::write(
        sandbox.path("widget.json"),
        r#"{"typeName": "x/../../victim::Svc::Res", "properties": {}}"#,
    )
    .expect("write schema");

    let pipeline = Pipeline::new(sandbox.options("out"), FakeToolchain::default());
    let failure = pipeline.run().await.expect_err("run must fail");
    assert_eq!(failure.from, Stage::Loaded);
    assert_eq!(failure.attempted, Stage::Translated);
    assert!(pipeline.toolchain().untouched());
    assert_eq!(fs::read_dir(sandbox.path("victim")).expect("read victim").count(), 0);
    assert!(!sandbox.path("out").exists());
}

#[tokio::test]
async fn interrupted_run_stops_before_the_next_stage() {
    let sandbox = Sandbox::new();
    let flag = Arc::new(AtomicBool::new(true));
    let pipeline =
        Pipeline::new(sandbox.options("out"), FakeToolchain::default()).with_interrupt(flag);

    let failure = pipeline.run().await.expect_err("run must stop");
    assert_eq!(failure.from, Stage::Init);
    assert!(matches!(failure.error, PipelineError::Interrupted));
    assert!(pipeline.toolchain().untouched());
    assert!(sandbox.work_root_is_empty());
}
