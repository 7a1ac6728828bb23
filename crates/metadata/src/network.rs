use crate::types::{IpSummary, NetworkInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\b")
        .expect("IPv4 regex should compile")
});

static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,24}\b")
        .expect("domain regex should compile")
});

static KEYED_PORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)port\w*["']?(?:\s*[:=]\s*|\s+)["']?(\d{1,5})\b"#)
        .expect("port regex should compile")
});

static HOST_PORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\b(?:\d{1,3}\.){3}\d{1,3}|\blocalhost|\b[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}):(\d{1,5})\b")
        .expect("host:port regex should compile")
});

/// Suffixes that make a dotted token a file name rather than a domain
const FILE_EXTENSIONS: &[&str] = &[
    "xml", "json", "yaml", "yml", "ini", "cfg", "conf", "config", "txt", "text", "log", "csv",
    "py", "rs", "sh", "js", "html", "htm", "zip", "gz", "tar", "jar", "so", "exe", "bak",
];

/// Limits on how many samples are kept
#[derive(Debug, Clone, Copy)]
pub(crate) struct NetworkLimits {
    pub ip_samples: usize,
    pub domains: usize,
}

fn ip_summary(text: &str, max_samples: usize) -> IpSummary {
    let mut summary = IpSummary::default();
    let mut seen = HashSet::new();
    for found in IPV4.find_iter(text) {
        let ip = found.as_str();
        let subnet = ip.splitn(3, '.').take(2).collect::<Vec<_>>().join(".");
        *summary.subnets.entry(subnet).or_default() += 1;
        if seen.insert(ip) && summary.samples.len() < max_samples {
            summary.samples.push(ip.to_string());
        }
    }
    summary.total = seen.len();
    summary
}

fn domains(text: &str, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for found in DOMAIN.find_iter(text) {
        if out.len() >= max {
            break;
        }
        let domain = found.as_str().to_ascii_lowercase();
        let tld = domain.rsplit('.').next().unwrap_or_default();
        if FILE_EXTENSIONS.contains(&tld) || out.contains(&domain) {
            continue;
        }
        out.push(domain);
    }
    out
}

fn ports(text: &str) -> BTreeSet<u16> {
    KEYED_PORT
        .captures_iter(text)
        .chain(HOST_PORT.captures_iter(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u16>().ok())
        .filter(|&port| port != 0)
        .collect()
}

pub(crate) fn network_info(text: &str, limits: NetworkLimits) -> NetworkInfo {
    NetworkInfo {
        ip_addresses: ip_summary(text, limits.ip_samples),
        domains: domains(text, limits.domains),
        ports: ports(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LIMITS: NetworkLimits = NetworkLimits {
        ip_samples: 2,
        domains: 20,
    };

    #[test]
    fn summarises_ips_by_subnet() {
        let info = network_info("a 10.1.2.3 b 10.1.9.9 c 10.1.2.3 d 172.16.0.1 e 999.1.1.1", LIMITS);
        assert_eq!(info.ip_addresses.total, 3);
        assert_eq!(info.ip_addresses.samples, vec!["10.1.2.3", "10.1.9.9"]);
        assert_eq!(info.ip_addresses.subnets.get("10.1"), Some(&3));
        assert_eq!(info.ip_addresses.subnets.get("172.16"), Some(&1));
    }

    #[test]
    fn finds_domains_but_not_file_names() {
        let info = network_info(
            "nrf: https://NRF.op.example.net/x\ninclude amf.yaml\nalso nrf.op.example.net\n",
            LIMITS,
        );
        assert_eq!(info.domains, vec!["nrf.op.example.net"]);
    }

    #[test]
    fn collects_keyed_and_colon_ports() {
        let info = network_info(
            "sbi_port: 8080\nport=0\nurl: http://10.0.0.1:29510/nnrf\nlisten localhost:80\nport: 70000\n",
            LIMITS,
        );
        assert_eq!(info.ports.into_iter().collect::<Vec<_>>(), vec![80, 8080, 29510]);
    }
}
