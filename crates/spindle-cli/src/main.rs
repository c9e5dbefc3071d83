use std::error::Error;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use spindle_core::domain::{BlobUri, Metadata};
use spindle_core::impls::InMemoryObjectStore;
use spindle_core::params::{
    ExplicitBoolParameter, IntParameter, ListTaskReferenceParameter, StrParameter,
    TaskReferenceParameter,
};
use spindle_core::ports::MutableMetadataTarget;
use spindle_core::task::{ParamSpec, ParamValue, TaskClass};
use spindle_core::{CodecBuilder, MetadataBlobTarget, SpindleConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spindle_core=info,spindle_cli=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // (A) タスククラスを宣言して codec を組み立てる
    let download = TaskClass::builder("DownloadDataset")
        .param(ParamSpec::new("source", StrParameter))
        .param(ParamSpec::new("date", StrParameter))
        .build();
    let train = TaskClass::builder("TrainModel")
        .param(ParamSpec::new("dataset", TaskReferenceParameter::bounded("DownloadDataset")))
        .param(ParamSpec::new("epochs", IntParameter).with_default(10_i64))
        .param(
            ParamSpec::new("verbose", ExplicitBoolParameter)
                .with_default(false)
                .insignificant(),
        )
        .build();
    let evaluate = TaskClass::builder("EvaluateModels")
        .param(ParamSpec::new("models", ListTaskReferenceParameter::bounded("TrainModel")))
        .build();

    let config = SpindleConfig::from_env()?;
    let codec = CodecBuilder::new()
        .config(config.codec)
        .register(download.clone())?
        .register(train.clone())?
        .register(evaluate.clone())?
        .expect_families(&["DownloadDataset", "TrainModel", "EvaluateModels"])
        .build()?;

    // (B) ネストしたタスク参照を encode → decode
    let dataset = download.instantiate([
        ("source".to_string(), ParamValue::from("s3://raw/events")),
        ("date".to_string(), ParamValue::from("2024-01-01")),
    ])?;
    let models = [5_i64, 20]
        .into_iter()
        .map(|epochs| {
            train.instantiate([
                ("dataset".to_string(), ParamValue::Task(dataset.clone())),
                ("epochs".to_string(), ParamValue::Int(epochs)),
            ])
        })
        .collect::<Result<Vec<_>, _>>()?;
    let report = evaluate.instantiate([("models".to_string(), ParamValue::TaskList(models))])?;

    let encoded = codec.encode(&report)?;
    let decoded = codec.decode(&encoded)?;
    info!(task = %report, len = encoded.len(), "encoded task reference");
    println!("encoded : {encoded}");
    println!("decoded : {decoded}");
    println!("same    : {}", decoded == report);
    let models = decoded
        .get("models")
        .and_then(ParamValue::as_task_list)
        .unwrap_or_default();
    for model in models {
        let dataset = model.get("dataset").and_then(ParamValue::as_task);
        info!(
            model = %model,
            dataset = ?dataset.map(|d| d.family().to_string()),
            "decoded nested reference"
        );
    }

    // (C) 出力先 Blob にメタデータを付与
    let task_id = report.task_id()?;
    let uri = format!("gs://spindle-demo/reports/{task_id}.json");
    let store = Arc::new(InMemoryObjectStore::new());
    let report_body = serde_json::to_vec(&serde_json::json!({ "auc": 0.91 }))?;
    store.put_object(&BlobUri::parse(&uri)?, report_body)?;

    let target = MetadataBlobTarget::new(uri.as_str(), store.clone());
    let mut metadata = Metadata::new();
    metadata.insert("task_family".to_string(), report.family().to_string());
    metadata.insert("task_params".to_string(), encoded);
    target.set_metadata(metadata).await?;

    let stored = target.metadata().await?;
    println!("target  : {uri}");
    for (key, value) in &stored {
        println!("  {key} = {}", truncate(value, 48));
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}…", s.chars().take(max).collect::<String>())
    }
}
