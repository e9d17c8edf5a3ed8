//! Compile-time method contracts.
//!
//! A contract is a table from method name to parameter and result types. It
//! exists only in the type system: a client declared as
//! `JsonRpcClient<MyApi>` will only accept methods of `MyApi`, with the right
//! params, and decodes each reply into that method's output type. The runtime
//! underneath is the same stringly-typed pipeline used by
//! `JsonRpcClient<Untyped>`.
//!
//! ```rust
//! use json_rpc_client::rpc_contract;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct GetFooParams {
//!     pub foo_id: u32,
//! }
//!
//! #[derive(Deserialize)]
//! pub struct Foo {
//!     pub name: String,
//! }
//!
//! rpc_contract! {
//!     pub MyApi {
//!         GetFoo => "getFoo" (GetFooParams) -> Foo;
//!         GetBar => "getBar" (()) -> serde_json::Value;
//!     }
//! }
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use json_rpc_protocol::RpcOutcome;
use json_rpc_protocol::envelope::params_from_value;

use crate::client::RpcCall;
use crate::error::{ClientError, ClientResult};

/// Marker for a method table
pub trait RpcContract: Send + Sync + 'static {}

/// The absence of a contract: any method name, any params, caller-chosen result type
pub enum Untyped {}

impl RpcContract for Untyped {}

/// One entry of a contract
pub trait RpcMethod: 'static {
    type Contract: RpcContract;

    /// Wire name of the method
    const NAME: &'static str;

    /// Serializes to a JSON object, or to `null` for "no params"
    type Params: Serialize;

    type Output: DeserializeOwned;
}

/// A call to method `M`, as one element of a typed batch
pub struct TypedCall<M: RpcMethod> {
    pub params: M::Params,
    pub id: Option<String>,
}

impl<M: RpcMethod> TypedCall<M> {
    pub fn new(params: M::Params) -> Self {
        Self { params, id: None }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn into_rpc_call(self) -> ClientResult<RpcCall> {
        let params = params_from_value(serde_json::to_value(&self.params)?)?;
        Ok(RpcCall {
            method: M::NAME.to_string(),
            params,
            id: self.id,
        })
    }
}

/// A tuple of [`TypedCall`]s against contract `C`, sent as one batch.
///
/// Outcomes come back as a tuple of the same arity, each decoded to its
/// method's output type.
pub trait ContractBatch<C: RpcContract> {
    type Outcomes;

    fn into_calls(self) -> ClientResult<Vec<RpcCall>>;

    fn decode(outcomes: Vec<RpcOutcome<Value>>) -> ClientResult<Self::Outcomes>;
}

fn next_outcome<M: RpcMethod>(
    outcomes: &mut impl Iterator<Item = RpcOutcome<Value>>,
) -> ClientResult<RpcOutcome<M::Output>> {
    let outcome = outcomes.next().ok_or_else(|| {
        ClientError::invalid_request(format!("batch produced no outcome for {}", M::NAME))
    })?;
    Ok(outcome.decode()?)
}

macro_rules! impl_contract_batch {
    ($($m:ident $idx:tt),+) => {
        impl<C: RpcContract, $($m: RpcMethod<Contract = C>),+> ContractBatch<C> for ($(TypedCall<$m>,)+) {
            type Outcomes = ($(RpcOutcome<<$m as RpcMethod>::Output>,)+);

            fn into_calls(self) -> ClientResult<Vec<RpcCall>> {
                Ok(vec![$(self.$idx.into_rpc_call()?),+])
            }

            fn decode(outcomes: Vec<RpcOutcome<Value>>) -> ClientResult<Self::Outcomes> {
                let mut outcomes = outcomes.into_iter();
                Ok(($(next_outcome::<$m>(&mut outcomes)?,)+))
            }
        }
    };
}

impl_contract_batch!(M1 0);
impl_contract_batch!(M1 0, M2 1);
impl_contract_batch!(M1 0, M2 1, M3 2);
impl_contract_batch!(M1 0, M2 1, M3 2, M4 3);
impl_contract_batch!(M1 0, M2 1, M3 2, M4 3, M5 4);
impl_contract_batch!(M1 0, M2 1, M3 2, M4 3, M5 4, M6 5);
impl_contract_batch!(M1 0, M2 1, M3 2, M4 3, M5 4, M6 5, M7 6);
impl_contract_batch!(M1 0, M2 1, M3 2, M4 3, M5 4, M6 5, M7 6, M8 7);

/// Declare a contract type and one marker type per method
#[macro_export]
macro_rules! rpc_contract {
    (
        $(#[$contract_meta:meta])*
        $vis:vis $contract:ident {
            $(
                $(#[$method_meta:meta])*
                $method:ident => $name:literal ($params:ty) -> $output:ty;
            )*
        }
    ) => {
        $(#[$contract_meta])*
        $vis enum $contract {}

        impl $crate::contract::RpcContract for $contract {}

        $(
            $(#[$method_meta])*
            $vis enum $method {}

            impl $crate::contract::RpcMethod for $method {
                type Contract = $contract;
                const NAME: &'static str = $name;
                type Params = $params;
                type Output = $output;
            }
        )*
    };
}
