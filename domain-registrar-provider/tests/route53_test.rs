//! Route 53 Domains 集成测试（只读操作，不会注册）
//!
//! 运行方式:
//! ```bash
//! AWS_ACCESS_KEY_ID=xxx AWS_SECRET_ACCESS_KEY=xxx TEST_DOMAIN=example.com \
//!     cargo test -p domain-registrar-provider --test route53_test -- --ignored --nocapture
//! ```

mod common;

use common::{TestContext, unlikely_domain};
use domain_registrar_provider::{Availability, ErrorKind};

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and TEST_DOMAIN"]
async fn test_route53_check_availability() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::route53(), "创建测试上下文失败");
    let domain = unlikely_domain("com");
    let quote = require_ok!(
        ctx.client.query_availability(&domain).await,
        "CheckDomainAvailability 调用失败"
    );
    assert_eq!(quote.availability, Availability::Available);

    println!("✓ {domain} -> {:?}", quote.availability);
}

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and TEST_DOMAIN"]
async fn test_route53_records_are_unsupported() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::route53(), "创建测试上下文失败");
    let err = ctx.client.fetch_dns_records(&ctx.domain).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}
