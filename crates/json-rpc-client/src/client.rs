//! Main JSON-RPC client implementation

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

use json_rpc_protocol::envelope::batch_to_value;
use json_rpc_protocol::{JsonRpcCall, JsonRpcParams, ReplyValidator, RpcOutcome, correlate};

use crate::config::{ClientConfig, ConfigOverride, IdGenerator};
use crate::contract::{ContractBatch, RpcContract, RpcMethod, TypedCall, Untyped};
use crate::error::{ClientError, ClientResult};
use crate::observer::RpcObserver;
use crate::transport::{HttpTransport, SharedTransport, Transport, TransportResponse};

/// One call of a stringly-typed request or batch
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    pub method: String,
    pub params: Option<JsonRpcParams>,
    pub id: Option<String>,
}

impl RpcCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
            id: None,
        }
    }

    pub fn with_params(mut self, params: JsonRpcParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// JSON-RPC 2.0 client.
///
/// `C` is the method contract; the default [`Untyped`] accepts any method name.
/// The client is `Send + Sync` and can be shared across tasks. Every call works
/// on its own snapshot of the configuration.
pub struct JsonRpcClient<C: RpcContract = Untyped> {
    /// Configuration, replaced wholesale on merge
    config: RwLock<ClientConfig>,
    /// Transport layer
    transport: SharedTransport,
    /// Optional traffic observer
    observer: Option<Arc<dyn RpcObserver>>,
    _contract: PhantomData<fn() -> C>,
}

impl<C: RpcContract> std::fmt::Debug for JsonRpcClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcClient")
            .field("config", &*self.config.read())
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: RpcContract> JsonRpcClient<C> {
    /// Create a client over HTTP
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        JsonRpcClientBuilder::new().with_config(config).build()
    }

    /// Current configuration
    pub fn config(&self) -> ClientConfig {
        self.config.read().clone()
    }

    /// Merge `overrides` into the client configuration.
    ///
    /// Either all fields are applied and validated, or the configuration is
    /// left unchanged and the error is returned.
    pub fn merge_config(&self, overrides: ConfigOverride) -> ClientResult<()> {
        self.config.write().merge(overrides)?;
        Ok(())
    }

    /// Call a method declared in contract `C`
    pub async fn invoke<M>(&self, params: M::Params) -> ClientResult<RpcOutcome<M::Output>>
    where
        M: RpcMethod<Contract = C>,
    {
        self.invoke_with(TypedCall::<M>::new(params), None).await
    }

    /// Call a method declared in contract `C` with an explicit id and/or config overrides
    pub async fn invoke_with<M>(
        &self,
        call: TypedCall<M>,
        overrides: Option<ConfigOverride>,
    ) -> ClientResult<RpcOutcome<M::Output>>
    where
        M: RpcMethod<Contract = C>,
    {
        let call = call.into_rpc_call()?;
        Ok(self.execute(call, overrides).await?.decode()?)
    }

    /// Send a tuple of typed calls as one batch
    pub async fn batch<B>(&self, calls: B) -> ClientResult<B::Outcomes>
    where
        B: ContractBatch<C>,
    {
        let outcomes = self.execute_batch(calls.into_calls()?).await?;
        B::decode(outcomes)
    }

    fn snapshot(&self, overrides: Option<ConfigOverride>) -> ClientResult<ClientConfig> {
        if let Some(overrides) = overrides.filter(|o| !o.is_empty()) {
            let mut config = self.config.write();
            config.merge(overrides)?;
            return Ok(config.clone());
        }
        Ok(self.config.read().clone())
    }

    /// Check a call without drawing an id from the generator
    fn unaddressed(call: RpcCall) -> ClientResult<(JsonRpcCall, Option<String>)> {
        Ok((JsonRpcCall::new(call.method, call.params, None)?, call.id))
    }

    fn address(
        config: &ClientConfig,
        (mut envelope, explicit): (JsonRpcCall, Option<String>),
    ) -> JsonRpcCall {
        envelope.id = config.resolve_id(explicit);
        envelope
    }

    fn envelope(config: &ClientConfig, call: RpcCall) -> ClientResult<JsonRpcCall> {
        Ok(Self::address(config, Self::unaddressed(call)?))
    }

    /// Single round trip through the transport; the only await point of a call
    async fn exchange(&self, config: &ClientConfig, body: Value) -> ClientResult<TransportResponse> {
        if let Some(observer) = &self.observer {
            observer.on_request(&config.url, &body);
        }

        let response = self
            .transport
            .send(&config.url, &config.headers, &body)
            .await
            .inspect_err(|e| warn!(url = %config.url, error = %e, "JSON-RPC transport failed"))?;

        if let Some(observer) = &self.observer {
            observer.on_reply(response.status, &response.body);
        }

        Ok(response)
    }

    async fn execute(
        &self,
        call: RpcCall,
        overrides: Option<ConfigOverride>,
    ) -> ClientResult<RpcOutcome<Value>> {
        let config = self.snapshot(overrides)?;
        let envelope = Self::envelope(&config, call)?;

        debug!(method = %envelope.method, id = ?envelope.id, "Sending JSON-RPC request");

        let response = self.exchange(&config, envelope.to_value()?).await?;
        let reply = ReplyValidator::assert_single(&response.body)?;

        if let (Some(sent), Some(received)) = (&envelope.id, &reply.id)
            && *sent != received.correlation_key()
        {
            warn!(sent = %sent, received = %received, "JSON-RPC reply id does not match request");
        }

        debug!(
            method = %envelope.method,
            status = response.status,
            is_error = reply.is_error(),
            "JSON-RPC reply received"
        );

        Ok(reply.into())
    }

    async fn execute_batch(&self, calls: Vec<RpcCall>) -> ClientResult<Vec<RpcOutcome<Value>>> {
        if calls.is_empty() {
            return Err(ClientError::invalid_request("batch must contain at least one call"));
        }

        // Every call is checked before any id is generated
        let unaddressed = calls
            .into_iter()
            .map(Self::unaddressed)
            .collect::<ClientResult<Vec<_>>>()?;

        let config = self.snapshot(None)?;
        let envelopes: Vec<JsonRpcCall> = unaddressed
            .into_iter()
            .map(|pending| Self::address(&config, pending))
            .collect();

        debug!(size = envelopes.len(), "Sending JSON-RPC batch");

        let response = self.exchange(&config, batch_to_value(&envelopes)?).await?;
        let replies = ReplyValidator::assert_batch(&response.body)?;

        let request_ids: Vec<Option<String>> =
            envelopes.iter().map(|envelope| envelope.id.clone()).collect();
        let replies = correlate(&request_ids, replies, &response.body)?;

        debug!(
            size = replies.len(),
            status = response.status,
            errors = replies.iter().filter(|reply| reply.is_error()).count(),
            "JSON-RPC batch reply received"
        );

        Ok(replies.into_iter().map(RpcOutcome::from).collect())
    }
}

impl JsonRpcClient<Untyped> {
    /// Call `method` and decode a successful result as `T`
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<JsonRpcParams>,
    ) -> ClientResult<RpcOutcome<T>> {
        let call = RpcCall {
            method: method.to_string(),
            params,
            id: None,
        };
        self.call_with(call, None).await
    }

    /// Call with an explicit id and/or configuration overrides.
    ///
    /// Overrides are merged into the client's configuration before the call,
    /// so they persist for later calls.
    pub async fn call_with<T: DeserializeOwned>(
        &self,
        call: RpcCall,
        overrides: Option<ConfigOverride>,
    ) -> ClientResult<RpcOutcome<T>> {
        Ok(self.execute(call, overrides).await?.decode()?)
    }

    /// Send `calls` as one batch; outcomes are returned in request order
    pub async fn batch_call<T: DeserializeOwned>(
        &self,
        calls: Vec<RpcCall>,
    ) -> ClientResult<Vec<RpcOutcome<T>>> {
        self.execute_batch(calls)
            .await?
            .into_iter()
            .map(|outcome| outcome.decode().map_err(ClientError::from))
            .collect()
    }
}

/// Builder for creating JSON-RPC clients
pub struct JsonRpcClientBuilder<C: RpcContract = Untyped> {
    config: ClientConfig,
    transport: Option<SharedTransport>,
    observer: Option<Arc<dyn RpcObserver>>,
    _contract: PhantomData<fn() -> C>,
}

impl<C: RpcContract> JsonRpcClientBuilder<C> {
    /// Create a new client builder
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
            observer: None,
            _contract: PhantomData,
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set endpoint URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.config.headers = headers;
        self
    }

    /// Set the request id source
    pub fn with_id_generator(mut self, id_generator: IdGenerator) -> Self {
        self.config.id_generator = Some(id_generator);
        self
    }

    /// Set transport
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set traffic observer
    pub fn with_observer(mut self, observer: impl RpcObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// Falls back to [`HttpTransport`] when no transport was set.
    pub fn build(self) -> ClientResult<JsonRpcClient<C>> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        Ok(JsonRpcClient {
            config: RwLock::new(self.config),
            transport,
            observer: self.observer,
            _contract: PhantomData,
        })
    }
}

impl<C: RpcContract> Default for JsonRpcClientBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_client_builder() {
        let client: JsonRpcClient = JsonRpcClientBuilder::new()
            .with_url("http://localhost:8080/rpc")
            .with_headers(HashMap::from([("x-trace".to_string(), "t".to_string())]))
            .with_header("x-api-key", "k")
            .build()
            .unwrap();

        let config = client.config();
        assert_eq!(config.url, "http://localhost:8080/rpc");
        assert_eq!(config.headers.get("x-api-key").map(String::as_str), Some("k"));
        assert_eq!(config.headers.get("x-trace").map(String::as_str), Some("t"));
    }

    #[test]
    fn test_builder_requires_url() {
        let err = JsonRpcClientBuilder::<Untyped>::new().build().unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::MissingUrl)));
    }

    #[test]
    fn test_merge_config_failure_keeps_previous_config() {
        let client: JsonRpcClient =
            JsonRpcClient::new(ClientConfig::new("http://localhost:8080/rpc")).unwrap();

        assert!(client.merge_config(ConfigOverride::new().url("")).is_err());
        assert_eq!(client.config().url, "http://localhost:8080/rpc");

        client
            .merge_config(ConfigOverride::new().url("http://localhost:9090/rpc"))
            .unwrap();
        assert_eq!(client.config().url, "http://localhost:9090/rpc");
    }

    #[test]
    fn test_envelope_id_resolution() {
        let config = ClientConfig::new("http://localhost/rpc")
            .with_id_generator(IdGenerator::sequential("req_"));

        let generated = JsonRpcClient::<Untyped>::envelope(&config, RpcCall::new("a")).unwrap();
        assert_eq!(generated.id.as_deref(), Some("req_0"));

        let explicit =
            JsonRpcClient::<Untyped>::envelope(&config, RpcCall::new("a").with_id("mine")).unwrap();
        assert_eq!(explicit.id.as_deref(), Some("mine"));

        let empty = JsonRpcClient::<Untyped>::envelope(&config, RpcCall::new(""));
        assert!(matches!(empty, Err(ClientError::InvalidRequest(_))));
    }

    #[test]
    fn test_rejected_call_does_not_consume_id() {
        let config = ClientConfig::new("http://localhost/rpc")
            .with_id_generator(IdGenerator::sequential("req_"));

        assert!(JsonRpcClient::<Untyped>::envelope(&config, RpcCall::new("")).is_err());

        let next = JsonRpcClient::<Untyped>::envelope(&config, RpcCall::new("a")).unwrap();
        assert_eq!(next.id.as_deref(), Some("req_0"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonRpcClient>();
    }
}
