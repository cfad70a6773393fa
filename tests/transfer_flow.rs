//! End-to-end transfer flow
//!
//! Drives a CW20-collateral route through the public API: overlay a token
//! set loaded with generic adapters, check the allowance, build the
//! approve + transfer bundle, and submit it as one atomic transaction.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use cosmwasm_std::Uint128;
use serde_json::json;

use common::{RecordingSigner, ScriptedProvider};
use warp_collateral_rs::cosmos::{
    AtomicExecutor, InterchainFeeConstant, SigningClient, StaticFeeSchedule, TxReceipt,
};
use warp_collateral_rs::{AdapterError, AdapterFactory, ChainContext, Token};

const CHAIN: &str = "terraclassictestnet";
const ROUTER: &str = "terra1zlm0h2xu6rhnjchn29hxnpvr74uxxqetar9y75zcehyx2mqezg9slj09ml";
const CW20: &str = "terra1cw20collateralcontract";
const OWNER: &str = "terra1owner";
const RECIPIENT: &str = "0x2144be4477202ba2d50c9a8be3181241878cf7d8";
const DEST_DOMAIN: u32 = 97;

fn route_tokens() -> Vec<Token> {
    serde_json::from_value(json!([
        {
            "chainName": CHAIN,
            "standard": "collateral",
            "addressOrDenom": ROUTER,
            "collateralAddressOrDenom": CW20,
            "name": "LUNC",
            "symbol": "LUNC",
            "decimals": 6,
            "connections": [
                {"token": "ethereum|bsctestnet|0x2144be4477202ba2d50c9a8be3181241878cf7d8"}
            ]
        },
        {
            "chainName": CHAIN,
            "standard": "synthetic",
            "addressOrDenom": "terra1synthetic",
            "name": "wLUNC",
            "symbol": "wLUNC",
            "decimals": 6
        }
    ]))
    .unwrap()
}

fn factory(provider: ScriptedProvider) -> AdapterFactory {
    AdapterFactory::new().with_chain(
        CHAIN,
        ChainContext {
            provider: Arc::new(provider),
            quoter: Arc::new(StaticFeeSchedule::new(vec![InterchainFeeConstant {
                origin: CHAIN.to_string(),
                destination_domain: DEST_DOMAIN,
                address_or_denom: "uluna".to_string(),
                amount: Uint128::new(1_780_832_150),
            }])),
        },
    )
}

fn cw20_provider(allowance: u128) -> ScriptedProvider {
    ScriptedProvider::new()
        .respond(ROUTER, "token_default", json!({"type": {"c_w20": {"contract": CW20}}}))
        .respond(
            CW20,
            "allowance",
            json!({"allowance": allowance.to_string(), "expires": {"never": {}}}),
        )
        .respond(CW20, "balance", json!({"balance": "9000000"}))
}

fn executor_with(signer: Arc<RecordingSigner>) -> AtomicExecutor {
    let mut sessions: HashMap<String, Arc<dyn SigningClient>> = HashMap::new();
    sessions.insert(CHAIN.to_string(), signer);
    AtomicExecutor::new(Arc::new(sessions))
}

#[tokio::test]
async fn test_approve_then_transfer_submits_one_atomic_transaction() {
    let factory = factory(cw20_provider(100));
    let mut tokens: Vec<_> = route_tokens()
        .into_iter()
        .map(|t| factory.create_token_generic(t).unwrap())
        .collect();

    // Retrofit the generically-constructed set
    let report = factory.overlay(&mut tokens);
    assert_eq!(report.patched, 1);
    assert!(report.errors.is_empty());

    let adapter = tokens[0].adapter();
    let amount = Uint128::new(5_000_000);

    // Allowance of 100 is below the requested amount
    assert!(
        adapter
            .is_approve_required(Some(OWNER), Some(ROUTER), Some(amount))
            .await
    );

    let approval = adapter.build_approval(ROUTER, amount).await.unwrap();
    let transfer = adapter
        .build_transfer_remote(DEST_DOMAIN, RECIPIENT, amount, None)
        .await
        .unwrap();

    // Contract-fungible collateral: funds carry the gas fee only
    let funds = transfer.funds();
    assert_eq!(funds.len(), 1);
    assert_eq!(funds[0].denom, "uluna");
    assert_eq!(funds[0].amount.u128(), 1_780_832_150);

    let signer = RecordingSigner::new();
    let executor = executor_with(signer.clone());

    let pending = executor
        .submit(CHAIN, &[approval, transfer])
        .await
        .unwrap();
    assert_eq!(pending.hash(), "CAFEBABE");

    // Exactly one multi-execute call carrying both messages in order
    let calls = signer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 2);
    assert_eq!(calls[0][0].contract_addr, CW20);
    assert!(calls[0][0].msg.get("increase_allowance").is_some());
    assert!(calls[0][0].funds.is_empty());
    assert_eq!(calls[0][1].contract_addr, ROUTER);
    assert!(calls[0][1].msg.get("transfer_remote").is_some());
    assert_eq!(calls[0][1].funds.len(), 1);
    drop(calls);

    let receipt = pending.confirm().await.unwrap();
    assert!(receipt.is_success());
    assert_eq!(receipt.height, Some(42));
}

#[tokio::test]
async fn test_sufficient_allowance_skips_approval() {
    let factory = factory(cw20_provider(10_000_000));
    let mut tokens = vec![factory
        .create_token_generic(route_tokens().remove(0))
        .unwrap()];
    factory.overlay(&mut tokens);

    let adapter = tokens[0].adapter();
    assert!(
        !adapter
            .is_approve_required(Some(OWNER), Some(ROUTER), Some(Uint128::new(5_000_000)))
            .await
    );

    let transfer = adapter
        .build_transfer_remote(DEST_DOMAIN, RECIPIENT, Uint128::new(5_000_000), None)
        .await
        .unwrap();

    let signer = RecordingSigner::new();
    let executor = executor_with(signer.clone());
    executor.submit(CHAIN, &[transfer]).await.unwrap();

    let calls = signer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
}

#[tokio::test]
async fn test_overlay_twice_behaves_like_once() {
    let factory = factory(cw20_provider(100));
    let mut tokens: Vec<_> = route_tokens()
        .into_iter()
        .map(|t| factory.create_token_generic(t).unwrap())
        .collect();

    factory.overlay(&mut tokens);
    let second = factory.overlay(&mut tokens);
    assert_eq!(second.patched, 0);

    // Behavior after double overlay matches a single overlay
    let transfer = tokens[0]
        .adapter()
        .build_transfer_remote(DEST_DOMAIN, RECIPIENT, Uint128::new(1), None)
        .await
        .unwrap();
    assert_eq!(transfer.funds().len(), 1);
    assert_eq!(transfer.funds()[0].denom, "uluna");
}

#[tokio::test]
async fn test_failed_transaction_surfaces_receipt_details() {
    let factory = factory(cw20_provider(10_000_000));
    let mut tokens = vec![factory
        .create_token_generic(route_tokens().remove(0))
        .unwrap()];
    factory.overlay(&mut tokens);

    let transfer = tokens[0]
        .adapter()
        .build_transfer_remote(DEST_DOMAIN, RECIPIENT, Uint128::new(1), None)
        .await
        .unwrap();

    let signer = RecordingSigner::new();
    signer.set_receipt(TxReceipt {
        hash: "CAFEBABE".to_string(),
        code: 5,
        height: Some(43),
        raw_log: Some("insufficient funds".to_string()),
    });

    let executor = executor_with(signer.clone());
    let pending = executor.submit(CHAIN, &[transfer]).await.unwrap();

    match pending.confirm().await {
        Err(AdapterError::TransactionFailed { code, raw_log, .. }) => {
            assert_eq!(code, 5);
            assert_eq!(raw_log, "insufficient funds");
        }
        _ => panic!("expected TransactionFailed"),
    }
}

#[tokio::test]
async fn test_submit_without_session_fails_fast() {
    let factory = factory(cw20_provider(10_000_000));
    let mut tokens = vec![factory
        .create_token_generic(route_tokens().remove(0))
        .unwrap()];
    factory.overlay(&mut tokens);

    let transfer = tokens[0]
        .adapter()
        .build_transfer_remote(DEST_DOMAIN, RECIPIENT, Uint128::new(1), None)
        .await
        .unwrap();

    let signer = RecordingSigner::new();
    let executor = executor_with(signer.clone());

    let result = executor.submit("chain-without-wallet", &[transfer]).await;
    assert!(matches!(
        result,
        Err(AdapterError::SignerUnavailable { .. })
    ));
    assert!(signer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_router_outage_still_builds_safe_transfer() {
    // Router descriptor query fails outright; the permissive default treats
    // the collateral as contract-fungible and keeps gas-only funds
    let provider = ScriptedProvider::new().fail(ROUTER, "token_default", "router unreachable");
    let factory = factory(provider);

    let mut tokens = vec![factory
        .create_token_generic(route_tokens().remove(0))
        .unwrap()];
    factory.overlay(&mut tokens);

    let adapter = tokens[0].adapter();
    assert_eq!(adapter.denom().await, CW20);

    let transfer = adapter
        .build_transfer_remote(DEST_DOMAIN, RECIPIENT, Uint128::new(1_000_000), None)
        .await
        .unwrap();
    let funds = transfer.funds();
    assert_eq!(funds.len(), 1);
    assert_eq!(funds[0].denom, "uluna");
}
