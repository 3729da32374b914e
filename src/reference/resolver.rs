use crate::url::{is_blocked_host, normalized_domain, root_url};
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};
use url::Url;

/// The crawl starting point for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSeed {
    /// Normalized domain key (lowercase host, no leading `www.`)
    pub domain: String,

    /// Scheme and authority of the first reference URL seen on this domain
    pub root: String,
}

/// Mapping of normalized domain to its seed, ordered by domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainMap {
    seeds: BTreeMap<String, DomainSeed>,
}

impl DomainMap {
    /// Builds the domain map from plain reference URLs
    ///
    /// The first root seen for a domain is kept. Unparseable URLs and URLs
    /// on blocked domains are skipped.
    pub fn resolve<S: AsRef<str>>(urls: &[S]) -> Self {
        let mut seeds = BTreeMap::new();

        for raw in urls {
            let Some((domain, root)) = domain_and_root(raw.as_ref()) else {
                tracing::trace!("Skipping unresolvable reference URL: {}", raw.as_ref());
                continue;
            };

            if let btree_map::Entry::Vacant(entry) = seeds.entry(domain.clone()) {
                tracing::debug!("Seed for {}: {}", domain, root);
                entry.insert(DomainSeed { domain, root });
            }
        }

        Self { seeds }
    }

    pub fn get(&self, domain: &str) -> Option<&DomainSeed> {
        self.seeds.get(domain)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.seeds.contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Iterates the seeds in domain order
    pub fn iter(&self) -> impl Iterator<Item = &DomainSeed> {
        self.seeds.values()
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.seeds.keys().map(String::as_str)
    }
}

impl FromIterator<DomainSeed> for DomainMap {
    /// Collects seeds, keeping the first seed given for each domain
    fn from_iter<I: IntoIterator<Item = DomainSeed>>(iter: I) -> Self {
        let mut seeds = BTreeMap::new();
        for seed in iter {
            seeds.entry(seed.domain.clone()).or_insert(seed);
        }
        Self { seeds }
    }
}

/// Convenience wrapper for [`DomainMap::resolve`]
pub fn resolve_domains<S: AsRef<str>>(urls: &[S]) -> DomainMap {
    DomainMap::resolve(urls)
}

fn domain_and_root(raw: &str) -> Option<(String, String)> {
    let url = Url::parse(raw.trim()).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    if is_blocked_host(url.host_str()?) {
        return None;
    }
    Some((normalized_domain(&url)?, root_url(&url)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_root_wins() {
        let map = DomainMap::resolve(&[
            "https://www.acme.com/investors",
            "http://acme.com/about",
            "https://ir.acme.com/reports",
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("acme.com").unwrap().root, "https://www.acme.com");
        assert_eq!(map.get("ir.acme.com").unwrap().root, "https://ir.acme.com");
    }

    #[test]
    fn test_blocked_and_invalid_skipped() {
        let map = DomainMap::resolve(&[
            "https://s3.amazonaws.com/bucket/a.pdf",
            "https://files.s3.amazonaws.com/b.pdf",
            "not a url",
            "ftp://acme.com/file",
        ]);
        assert!(map.is_empty());
    }

    #[test]
    fn test_domains_sorted() {
        let map = resolve_domains(&["https://zeta.com/", "https://alpha.com/x"]);
        let domains: Vec<&str> = map.domains().collect();
        assert_eq!(domains, vec!["alpha.com", "zeta.com"]);
    }

    #[test]
    fn test_port_distinguishes_domains() {
        let map = resolve_domains(&["http://127.0.0.1:8001/a", "http://127.0.0.1:8002/b"]);
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("127.0.0.1:8002").unwrap().root,
            "http://127.0.0.1:8002"
        );
    }

    #[test]
    fn test_from_iter_keeps_first() {
        let map: DomainMap = vec![
            DomainSeed {
                domain: "acme.com".into(),
                root: "https://acme.com".into(),
            },
            DomainSeed {
                domain: "acme.com".into(),
                root: "http://www.acme.com".into(),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(map.get("acme.com").unwrap().root, "https://acme.com");
    }
}
