//! 阿里云集成测试（只读操作，不会下单）
//!
//! 运行方式:
//! ```bash
//! ALIYUN_ACCESS_KEY_ID=xxx ALIYUN_ACCESS_KEY_SECRET=xxx TEST_DOMAIN=example.cn \
//!     cargo test -p domain-registrar-provider --test aliyun_test -- --ignored --nocapture
//! ```

mod common;

use common::{TestContext, unlikely_domain};
use domain_registrar_provider::{Availability, PaginationParams};

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_check_domain() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::aliyun(), "创建测试上下文失败");
    let owned = ctx.client.check_availability(&ctx.domain).await;
    assert_eq!(owned.is_available, Availability::Unavailable);

    let fresh = ctx.client.check_availability(&unlikely_domain("cn")).await;
    assert_ne!(fresh.is_available, Availability::Unavailable);

    println!("✓ CheckDomain: owned={:?} fresh={:?}", owned.is_available, fresh.is_available);
}

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_list_first_page() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::aliyun(), "创建测试上下文失败");
    let page = require_ok!(
        ctx.client
            .list_dns_records(&ctx.domain, &PaginationParams { page: 1, page_size: 10 })
            .await,
        "list_dns_records 调用失败"
    );
    assert!(page.items.len() <= 10);

    let all = require_ok!(
        ctx.client.fetch_dns_records(&ctx.domain).await,
        "fetch_dns_records 调用失败"
    );
    assert!(all.len() >= page.items.len());

    println!("✓ DescribeDomainRecords: {} records", all.len());
}
