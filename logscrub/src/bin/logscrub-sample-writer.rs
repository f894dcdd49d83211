// logscrub/src/bin/logscrub-sample-writer.rs
//! Scheduled Lambda that writes a small timestamped JSON record to the bucket named by
//! the `bucket_name` environment variable.

use anyhow::Context;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;

use logscrub::logger;
use logscrub::S3Store;
use logscrub_core::scheduled::{utc_now, write_sample, SampleRecord, SAMPLE_PATH};
use logscrub_core::GenericValue;

const BUCKET_ENV: &str = "bucket_name";

async fn function_handler(
    event: LambdaEvent<GenericValue>,
    store: &S3Store,
    bucket: &str,
) -> Result<String, Error> {
    info!("Scheduled invocation {}", event.context.request_id);
    let now = utc_now();
    let record = SampleRecord::generate(now);
    let key = write_sample(store, bucket, SAMPLE_PATH, &record, false, now).await?;
    Ok(key)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_logger(None);

    let bucket = std::env::var(BUCKET_ENV)
        .with_context(|| format!("Environment variable '{BUCKET_ENV}' must name the target bucket"))?;
    let store = S3Store::from_env().await;

    run(service_fn(|event| function_handler(event, &store, &bucket))).await
}
