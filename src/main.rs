use anyhow::{anyhow, Context, Result};
use modtm::module::{ModuleSourceDataSource, ModuleSourceDataSourceModel};
use modtm::resource::{TelemetryResource, TelemetryResourceModel};
use modtm::{ModtmProvider, ProviderError, ProviderModel};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Local driver: runs a sequence of lifecycle steps against one provider instance.
// The Terraform plugin protocol is not spoken here.

#[derive(Debug, Deserialize)]
struct RunDocument {
    #[serde(default)]
    provider: ProviderModel,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Create { resource: TelemetryResourceModel },
    Read,
    Update { resource: TelemetryResourceModel },
    Delete,
    Import { id: String },
    DataSource { module_path: String },
    ModuleSource { module_path: String },
    ModuleVersion { module_path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries results, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_env("MODTM_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("reading run document from stdin")?;
    let doc: RunDocument = serde_json::from_str(&input).context("parsing run document")?;

    let provider = ModtmProvider::new(env!("CARGO_PKG_VERSION"));
    tracing::info!("{} provider {}", provider.metadata().type_name, provider.metadata().version);

    let data = provider.configure(doc.provider);
    let mut resource = TelemetryResource::new();
    resource.configure(Some(data.clone()));
    let data_source = ModuleSourceDataSource::configure(&data);

    let mut state: Option<TelemetryResourceModel> = None;
    let mut results = Vec::with_capacity(doc.steps.len());

    for step in doc.steps {
        let result = match step {
            Step::Create { resource: plan } => {
                let created = resource.create(plan).await.map_err(diagnose)?;
                state = Some(created.clone());
                json!({ "op": "create", "state": created })
            }
            Step::Read => {
                let current = state.take().ok_or_else(|| anyhow!("read before create"))?;
                let refreshed = resource.read(current).await.map_err(diagnose)?;
                state = Some(refreshed.clone());
                json!({ "op": "read", "state": refreshed })
            }
            Step::Update { resource: plan } => {
                let prior = state.take().ok_or_else(|| anyhow!("update before create"))?;
                let updated = resource.update(&prior, plan).await.map_err(diagnose)?;
                state = Some(updated.clone());
                json!({ "op": "update", "state": updated })
            }
            Step::Delete => {
                let current = state.take().ok_or_else(|| anyhow!("delete before create"))?;
                resource.delete(current).await.map_err(diagnose)?;
                json!({ "op": "delete", "state": Value::Null })
            }
            Step::Import { id } => {
                let imported = resource.import_state(&id).map_err(diagnose)?;
                state = Some(imported.clone());
                json!({ "op": "import", "state": imported })
            }
            Step::DataSource { module_path } => {
                let read = data_source.read(ModuleSourceDataSourceModel::new(module_path));
                json!({ "op": "data_source", "state": read })
            }
            Step::ModuleSource { module_path } => {
                let value = provider.module_source_function().run(&module_path);
                json!({ "op": "module_source", "result": value })
            }
            Step::ModuleVersion { module_path } => {
                let value = provider.module_version_function().run(&module_path);
                json!({ "op": "module_version", "result": value })
            }
        };
        results.push(result);
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn diagnose(e: ProviderError) -> anyhow::Error {
    let diagnostic = e.diagnostic();
    anyhow!("{}: {}", diagnostic.summary, diagnostic.detail)
}
