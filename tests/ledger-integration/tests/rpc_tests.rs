use tracechain_common::history::HistoryAction;
use tracechain_common::product::{Product, ProductId};
use tracechain_common::status::{classify, DisplayStatus};
use tracechain_common::timeline::build_timeline;
use tracechain_ledger::{
    Catalog, DecodeError, FetchError, JsonRpcSource, LedgerReader, Numbering, SourceError,
};
use tracechain_ledger_integration::{
    contract, event, init_tracing, owner, product, FakeNode, NodeState,
};

fn five_products() -> NodeState {
    NodeState::with_products((1..=5).map(product).collect())
}

/// All records come back in index order through the real JSON-RPC source.
#[tokio::test]
async fn fetches_every_record_in_order() {
    init_tracing();
    let node = FakeNode::start(five_products()).await;
    let reader = LedgerReader::new(node.source());

    let products = reader.fetch_all_products().await.unwrap();

    let ids: Vec<u64> = products.iter().map(|p| p.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(products[2], product(3));
    assert_eq!(node.state.lock().unwrap().record_calls(), vec![1, 2, 3, 4, 5]);
}

/// Concurrent fetches still land in index order.
#[tokio::test]
async fn concurrent_fetch_preserves_order() {
    let node = FakeNode::start(five_products()).await;
    let reader = LedgerReader::new(node.source()).with_concurrency(4);

    let products = reader.fetch_all_products().await.unwrap();

    let ids: Vec<u64> = products.iter().map(|p| p.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn empty_ledger_issues_no_record_calls() {
    let node = FakeNode::start(NodeState::default()).await;
    let reader = LedgerReader::new(node.source());

    let products = reader.fetch_all_products().await.unwrap();

    assert!(products.is_empty());
    let state = node.state.lock().unwrap();
    assert_eq!(state.calls.len(), 1);
    assert!(state.record_calls().is_empty());
}

/// A revert at index 3 of 5 fails the whole fetch; nothing after it is requested.
#[tokio::test]
async fn revert_mid_fetch_fails_without_partial_list() {
    init_tracing();
    let mut state = five_products();
    state.revert_at.insert(3);
    let node = FakeNode::start(state).await;
    let reader = LedgerReader::new(node.source());

    let err = reader.fetch_all_products().await.unwrap_err();

    match err {
        FetchError::RecordUnavailable {
            index,
            source: SourceError::Rpc { code, .. },
        } => {
            assert_eq!(index, 3);
            assert_eq!(code, 3);
        }
        other => panic!("expected RecordUnavailable(3), got {other:?}"),
    }
    assert_eq!(node.state.lock().unwrap().record_calls(), vec![1, 2, 3]);
}

#[tokio::test]
async fn undecodable_record_is_a_decode_mismatch() {
    let mut state = five_products();
    state.garbage_at.insert(2);
    let node = FakeNode::start(state).await;
    let reader = LedgerReader::new(node.source());

    let err = reader.fetch_all_products().await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::DecodeMismatch {
            index: 2,
            source: DecodeError::Abi(_)
        }
    ));
}

#[tokio::test]
async fn zero_based_numbering_reads_from_index_zero() {
    let mut state = NodeState::default();
    state.counter = 2;
    state.products.insert(0, product(10));
    state.products.insert(1, product(11));
    let node = FakeNode::start(state).await;
    let reader = LedgerReader::new(node.source()).with_numbering(Numbering::ZeroBased);

    let products = reader.fetch_all_products().await.unwrap();

    let ids: Vec<u64> = products.iter().map(|p| p.id.0).collect();
    assert_eq!(ids, vec![10, 11]);
    assert_eq!(node.state.lock().unwrap().record_calls(), vec![0, 1]);
}

/// The milk record: expired after its expiry date, in circulation before it.
#[tokio::test]
async fn milk_record_decodes_and_classifies() {
    let milk = Product {
        id: ProductId(5),
        name: "Milk".into(),
        description: None,
        ingredients: None,
        manufacture_date: None,
        expiry_date: Some(1_700_000_000),
        price: 20_000,
        owner: "0x0000000000000000000000000000000000000abc".parse().unwrap(),
        status: 0,
        created_at: 1_690_000_000,
    };
    let node = FakeNode::start(NodeState::with_products(vec![milk.clone()])).await;
    let reader = LedgerReader::new(node.source());

    let fetched = reader.fetch_product(ProductId(5)).await.unwrap();

    assert_eq!(fetched, milk);
    assert_eq!(classify(&fetched, 1_800_000_000), DisplayStatus::Expired);
    assert_eq!(classify(&fetched, 1_650_000_000), DisplayStatus::InCirculation);
}

/// An unassigned id reads back as a zeroed record, which is not a product.
#[tokio::test]
async fn unassigned_id_is_not_found() {
    let node = FakeNode::start(NodeState::with_products((1..=3).map(product).collect())).await;
    let reader = LedgerReader::new(node.source());

    let err = reader.fetch_product(ProductId(99)).await.unwrap_err();

    assert_eq!(err, FetchError::NotFound { id: 99 });
    assert_eq!(node.state.lock().unwrap().record_calls(), vec![99]);
}

#[tokio::test]
async fn history_drives_the_timeline() {
    let mut state = five_products();
    state.history.insert(
        2,
        vec![
            event(HistoryAction::Created, 1_690_000_000),
            event(HistoryAction::Shipped, 1_690_100_000),
        ],
    );
    let node = FakeNode::start(state).await;
    let reader = LedgerReader::new(node.source());

    let product = reader.fetch_product(ProductId(2)).await.unwrap();
    let history = reader.fetch_history(ProductId(2)).await.unwrap();
    let timeline = build_timeline(&product, &history);

    let titles: Vec<&str> = timeline.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Product created", "Shipped"]);
    assert_eq!(timeline[1].note.as_deref(), Some("Ha Noi"));

    let none = reader.fetch_history(ProductId(4)).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn disabled_history_makes_no_call() {
    let node = FakeNode::start(five_products()).await;
    let reader = LedgerReader::new(node.source().with_history(false));

    let history = reader.fetch_history(ProductId(1)).await.unwrap();

    assert!(history.is_empty());
    assert!(node.state.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn unreachable_node_fails_the_count() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let reader = LedgerReader::new(JsonRpcSource::new(format!("http://{addr}"), contract()));

    let err = reader.fetch_all_products().await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::CountUnavailable {
            source: SourceError::Transport(_)
        }
    ));
}

#[tokio::test]
async fn catalog_refresh_and_summary() {
    let mut products: Vec<Product> = (1..=4).map(product).collect();
    products[1].status = 1;
    products[2].expiry_date = Some(1_600_000_000);
    products[3].status = 7;
    let node = FakeNode::start(NodeState::with_products(products)).await;
    let reader = LedgerReader::new(node.source());
    let mut catalog = Catalog::new();

    assert!(catalog.refresh(&reader).await.unwrap());

    let summary = catalog.summary(1_700_000_000);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.in_circulation, 1);
    assert_eq!(summary.sold, 1);
    assert_eq!(summary.expired, 1);
    assert_eq!(summary.stopped, 1);
    assert_eq!(catalog.get(ProductId(3)).unwrap().owner, owner(1));
}
