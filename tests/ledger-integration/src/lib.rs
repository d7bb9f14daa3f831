//! In-process stand-in for an Ethereum JSON-RPC node hosting the registry
//! contract. Answers `eth_call` for the three registry selectors with
//! ABI-encoded data, so the real `JsonRpcSource` can be driven end to end.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracechain_common::address::Address;
use tracechain_common::history::{HistoryAction, HistoryEvent};
use tracechain_common::product::{Product, ProductId};
use tracechain_ledger::abi::{self, ParamKind, Token};
use tracechain_ledger::schema::{
    history_tuple, product_tuple, vacant_tuple, PRODUCTS_SELECTOR, PRODUCT_COUNTER_SELECTOR,
    PRODUCT_HISTORY_SELECTOR,
};
use tracechain_ledger::JsonRpcSource;

pub const CONTRACT: &str = "0x081d9ff472e1b25b8820e9a17b2598f52132ccf8";

/// Contract state plus fault injection.
#[derive(Debug, Default)]
pub struct NodeState {
    pub counter: u64,
    pub products: BTreeMap<u64, Product>,
    pub history: BTreeMap<u64, Vec<HistoryEvent>>,
    /// Indices whose `products(i)` call reverts.
    pub revert_at: BTreeSet<u64>,
    /// Indices whose `products(i)` call returns bytes that are not a product tuple.
    pub garbage_at: BTreeSet<u64>,
    /// Every `(selector, argument)` seen, in arrival order.
    pub calls: Vec<(String, Option<u64>)>,
}

impl NodeState {
    /// Store `products` under ids `1..=n` and set the counter to match.
    pub fn with_products(products: Vec<Product>) -> Self {
        let mut state = Self::default();
        for product in products {
            state.counter += 1;
            state.products.insert(product.id.0, product);
        }
        state
    }

    /// Indices passed to `products(uint256)`, in arrival order.
    pub fn record_calls(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter(|(selector, _)| selector == &hex::encode(PRODUCTS_SELECTOR))
            .filter_map(|(_, arg)| *arg)
            .collect()
    }
}

pub struct FakeNode {
    pub url: String,
    pub state: Arc<Mutex<NodeState>>,
}

impl FakeNode {
    /// Bind on an ephemeral local port and serve until the runtime shuts down.
    pub async fn start(state: NodeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/", post(rpc_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake node crashed");
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn source(&self) -> JsonRpcSource {
        JsonRpcSource::new(self.url.clone(), contract())
    }
}

pub fn contract() -> Address {
    CONTRACT.parse().expect("valid contract address")
}

pub fn owner(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address(bytes)
}

pub fn product(id: u64) -> Product {
    Product {
        id: ProductId(id),
        name: format!("Product {id}"),
        description: Some(format!("Batch {id}")),
        ingredients: None,
        manufacture_date: Some(1_690_000_000),
        expiry_date: Some(1_750_000_000),
        price: 150_000,
        owner: owner(1),
        status: 0,
        created_at: 1_690_000_000 + id,
    }
}

pub fn event(action: HistoryAction, timestamp: u64) -> HistoryEvent {
    HistoryEvent {
        action,
        actor: owner(1),
        location: Some("Ha Noi".into()),
        note: None,
        timestamp,
    }
}

/// Route logs to the test writer; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn rpc_handler(
    State(state): State<Arc<Mutex<NodeState>>>,
    Json(req): Json<Value>,
) -> Json<Value> {
    let id = req["id"].clone();
    let outcome = answer(&state, &req);
    Json(match outcome {
        Ok(data) => json!({ "jsonrpc": "2.0", "id": id, "result": data }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message },
        }),
    })
}

fn answer(state: &Mutex<NodeState>, req: &Value) -> Result<String, (i64, String)> {
    if req["method"] != "eth_call" {
        return Err((-32601, "method not found".into()));
    }
    let data = req["params"][0]["data"]
        .as_str()
        .and_then(|s| hex::decode(s.trim_start_matches("0x")).ok())
        .filter(|d| d.len() >= 4)
        .ok_or((-32602, "invalid call data".to_string()))?;
    let (selector, args) = data.split_at(4);
    let arg = abi::decode(&[ParamKind::Uint(256)], args)
        .ok()
        .and_then(|tokens| match tokens.as_slice() {
            [Token::Uint(word)] => word.to_u64(),
            _ => None,
        });

    let mut state = state.lock().expect("node state poisoned");
    state.calls.push((hex::encode(selector), arg));

    let encoded = if selector == PRODUCT_COUNTER_SELECTOR {
        abi::encode(&[Token::uint(state.counter)])
    } else if selector == PRODUCTS_SELECTOR {
        let index = arg.ok_or((-32602, "missing index".to_string()))?;
        if state.revert_at.contains(&index) {
            return Err((3, "execution reverted".into()));
        }
        if state.garbage_at.contains(&index) {
            return Ok("0xdeadbeef".into());
        }
        match state.products.get(&index) {
            Some(p) => abi::encode(&product_tuple(p).0),
            None => abi::encode(&vacant_tuple().0),
        }
    } else if selector == PRODUCT_HISTORY_SELECTOR {
        let index = arg.ok_or((-32602, "missing index".to_string()))?;
        let entries = state
            .history
            .get(&index)
            .map(|events| {
                events
                    .iter()
                    .map(|e| Token::Tuple(history_tuple(e).0))
                    .collect()
            })
            .unwrap_or_default();
        abi::encode(&[Token::Array(entries)])
    } else {
        return Err((3, "execution reverted".into()));
    };
    Ok(format!("0x{}", hex::encode(encoded)))
}
