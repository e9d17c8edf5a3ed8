//! Batch demo
//!
//! Sends one single call and one typed batch to a JSON-RPC 2.0 endpoint.
//!
//! ```sh
//! RUST_LOG=json_rpc_client=debug cargo run --example batch_demo -- http://localhost:8080/rpc
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use json_rpc_client::{
    IdGenerator, JsonRpcClient, JsonRpcClientBuilder, RpcOutcome, TracingObserver, TypedCall,
    rpc_contract,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFooParams {
    pub foo_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct Foo {
    pub name: String,
}

#[derive(Serialize)]
pub struct GetBarParams {
    pub age: u32,
}

rpc_contract! {
    /// Methods exposed by the demo endpoint
    pub DemoApi {
        GetFoo => "getFoo" (GetFooParams) -> Foo;
        GetBar => "getBar" (GetBarParams) -> Value;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8080/rpc".to_string());

    let untyped: JsonRpcClient = JsonRpcClientBuilder::new()
        .with_url(&url)
        .with_id_generator(IdGenerator::uuid_v4())
        .with_observer(TracingObserver)
        .build()?;

    match untyped.call::<Value>("ping", None).await? {
        RpcOutcome::Success { value, .. } => info!(result = %value, "ping succeeded"),
        RpcOutcome::Failure { error, .. } => warn!(code = error.code, message = %error.message, "ping failed"),
    }

    let typed: JsonRpcClient<DemoApi> = JsonRpcClientBuilder::new()
        .with_url(&url)
        .with_id_generator(IdGenerator::sequential("demo-"))
        .with_observer(TracingObserver)
        .build()?;

    let (foo, bar) = typed
        .batch((
            TypedCall::<GetFoo>::new(GetFooParams { foo_id: 123 }),
            TypedCall::<GetBar>::new(GetBarParams { age: 42 }),
        ))
        .await?;

    match foo.into_result() {
        Ok(foo) => info!(name = %foo.name, "getFoo"),
        Err(error) => warn!(%error, "getFoo failed"),
    }
    match bar.into_result() {
        Ok(bar) => info!(result = %bar, "getBar"),
        Err(error) => warn!(%error, "getBar failed"),
    }

    Ok(())
}
