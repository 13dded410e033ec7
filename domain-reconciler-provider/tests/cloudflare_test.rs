//! Cloudflare Provider 集成测试
//!
//! 运行方式:
//! ```bash
//! CLOUDFLARE_API_TOKEN=xxx TEST_ZONE_ID=xxx \
//!     cargo test -p domain-reconciler-provider --test cloudflare_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{TestContext, generate_test_record_name};
use domain_reconciler_provider::{CreateDnsRecordRequest, DnsRecordType, ProviderError};

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN and TEST_ZONE_ID"]
async fn test_cloudflare_validate_credentials() {
    skip_if_no_credentials!("CLOUDFLARE_API_TOKEN", "TEST_ZONE_ID");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let valid = require_ok!(
        ctx.provider.validate_credentials().await,
        "validate_credentials 调用失败"
    );
    assert!(valid, "凭证应该有效");

    println!("✓ validate_credentials 测试通过");
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN and TEST_ZONE_ID"]
async fn test_cloudflare_get_zone_status() {
    skip_if_no_credentials!("CLOUDFLARE_API_TOKEN", "TEST_ZONE_ID");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let status = require_ok!(
        ctx.provider.get_zone_status(&ctx.zone_id).await,
        "get_zone_status 调用失败"
    );
    assert_eq!(status.id, ctx.zone_id);

    println!(
        "✓ get_zone_status 测试通过: {} {:?} activated={}",
        status.name,
        status.state,
        status.is_activated()
    );
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN"]
async fn test_cloudflare_unknown_zone_is_not_found() {
    skip_if_no_credentials!("CLOUDFLARE_API_TOKEN", "TEST_ZONE_ID");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let result = ctx
        .provider
        .get_zone_status("00000000000000000000000000000000")
        .await;
    assert!(
        matches!(result, Err(ProviderError::ZoneNotFound { .. })),
        "unexpected result: {result:?}"
    );

    println!("✓ unknown zone 测试通过");
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN and TEST_ZONE_ID; creates a TXT record"]
async fn test_cloudflare_ensure_record_is_idempotent() {
    skip_if_no_credentials!("CLOUDFLARE_API_TOKEN", "TEST_ZONE_ID");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let req = CreateDnsRecordRequest {
        zone_id: ctx.zone_id.clone(),
        name: generate_test_record_name(),
        record_type: DnsRecordType::Txt,
        content: "domain-reconciler-test".to_string(),
        ttl: 1,
        proxied: false,
    };

    let first = require_ok!(ctx.provider.ensure_record(&req).await, "首次创建失败");
    assert!(first.is_created());

    let second = require_ok!(ctx.provider.ensure_record(&req).await, "重复创建失败");
    assert!(!second.is_created(), "重复记录应视为已存在");

    println!("✓ ensure_record 测试通过: {}", req.name);
}
