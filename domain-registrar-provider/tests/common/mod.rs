//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use domain_registrar_provider::{
    ClientOptions, RegistrarClient, RegistrarCredentials, create_registrar_client,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// A name nobody will have registered.
pub fn unlikely_domain(tld: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("rs-avail-{}.{tld}", &uuid[..12])
}

/// 测试上下文 - 封装 client 和测试域名
pub struct TestContext {
    pub client: Arc<dyn RegistrarClient>,
    /// Domain held in the test account (`TEST_DOMAIN`).
    pub domain: String,
}

impl TestContext {
    fn build(credentials: RegistrarCredentials, endpoint: Option<String>) -> Option<Self> {
        let domain = env::var("TEST_DOMAIN").ok()?;
        let options = ClientOptions {
            endpoint,
            timeout: None,
        };
        let client = create_registrar_client(credentials, &options).ok()?;
        Some(Self { client, domain })
    }

    /// `GoDaddy` 测试上下文；`GODADDY_ENDPOINT` 可指向 OTE 环境
    pub fn godaddy() -> Option<Self> {
        let api_key = env::var("GODADDY_API_KEY").ok()?;
        let api_secret = env::var("GODADDY_API_SECRET").ok()?;
        Self::build(
            RegistrarCredentials::Godaddy {
                api_key,
                api_secret,
            },
            env::var("GODADDY_ENDPOINT").ok(),
        )
    }

    /// 阿里云测试上下文
    pub fn aliyun() -> Option<Self> {
        let access_key_id = env::var("ALIYUN_ACCESS_KEY_ID").ok()?;
        let access_key_secret = env::var("ALIYUN_ACCESS_KEY_SECRET").ok()?;
        Self::build(
            RegistrarCredentials::Aliyun {
                access_key_id,
                access_key_secret,
            },
            None,
        )
    }

    /// Route 53 Domains 测试上下文
    pub fn route53() -> Option<Self> {
        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        Self::build(
            RegistrarCredentials::Route53 {
                access_key_id,
                secret_access_key,
            },
            None,
        )
    }
}
