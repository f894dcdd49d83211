// logscrub/src/bin/logscrub-lambda.rs
//! Lambda entry point. Accepts S3 event notifications and S3 Batch Operations jobs,
//! scrubs the referenced object in place and answers in the caller's protocol.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;

use logscrub::logger;
use logscrub::S3Store;
use logscrub_core::{GenericValue, InvocationResult, ScrubConfig, Scrubber};
use std::sync::Arc;

async fn function_handler(
    event: LambdaEvent<GenericValue>,
    scrubber: &Scrubber,
) -> Result<InvocationResult, Error> {
    let (payload, context) = event.into_parts();
    info!(
        "Invocation {} of {} ({} MB, log stream {}/{}), arn {}",
        context.request_id,
        context.env_config.function_name,
        context.env_config.memory,
        context.env_config.log_group,
        context.env_config.log_stream,
        context.invoked_function_arn
    );
    Ok(scrubber.handle_event(&payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_logger(None);

    let config = ScrubConfig::from_env()?;
    let store = Arc::new(S3Store::from_env().await);
    let scrubber = Scrubber::new(store, config)?;
    for pattern in scrubber.engine().patterns() {
        info!("Cold start: redacting keys matching {}", pattern);
    }

    run(service_fn(|event| function_handler(event, &scrubber))).await
}
