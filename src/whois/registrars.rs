//! Registrar homepage table.
//!
//! Several ccTLD registries (notably CNNIC) report the sponsoring registrar by
//! name only. This table fills in the homepage for well-known ones.

use std::collections::HashMap;

/// Get the homepage URL for a registrar name from the built-in table.
pub fn builtin_registrar_url(registrar: &str) -> Option<&'static str> {
    match registrar.trim() {
        "阿里云计算有限公司（万网）" | "阿里云计算有限公司" | "北京万网志成科技有限公司" => {
            Some("https://wanwang.aliyun.com")
        }
        "北京新网数码信息技术有限公司" => Some("http://www.xinnet.com"),
        "北京新网互联科技有限公司" => Some("http://www.dns.com.cn"),
        "腾讯云计算（北京）有限责任公司" | "DNSPod, Inc." => {
            Some("https://dnspod.cloud.tencent.com")
        }
        "厦门易名科技股份有限公司" => Some("https://www.ename.com"),
        "成都西维数码科技有限公司" => Some("https://www.west.cn"),
        "广东时代互联科技有限公司" => Some("https://www.now.cn"),
        "商中在线科技股份有限公司" => Some("https://www.bizcn.com"),
        "厦门三五互联科技股份有限公司" => Some("https://www.35.com"),
        "中企动力科技股份有限公司" => Some("https://www.ce.cn"),
        "北京中科三方网络技术有限公司" => Some("https://www.sfn.cn"),
        "福建省力天网络科技股份有限公司" => Some("https://www.ltnic.com"),
        "华为云计算技术有限公司" => Some("https://www.huaweicloud.com"),
        "百度在线网络技术（北京）有限公司" => Some("https://cloud.baidu.com"),
        _ => None,
    }
}

/// Registrar name to homepage lookup: extra entries first, then the built-in table
#[derive(Debug, Clone, Default)]
pub struct RegistrarTable {
    extra: HashMap<String, String>,
}

impl RegistrarTable {
    /// Create a table backed only by the built-in entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry
    pub fn with_entry(mut self, registrar: impl Into<String>, url: impl Into<String>) -> Self {
        self.extra.insert(registrar.into(), url.into());
        self
    }

    pub fn lookup(&self, registrar: &str) -> Option<&str> {
        let registrar = registrar.trim();
        self.extra
            .get(registrar)
            .map(String::as_str)
            .or_else(|| builtin_registrar_url(registrar))
    }
}
