//! Photon image URLs.
//!
//! Photon is a resizing image proxy. Given any image URL this module produces
//! the URL of a resized, metadata-stripped copy, taking care of URLs that are
//! already proxied, screenshot-service URLs and private sites behind the
//! authenticated media proxy.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;
use wputils_common::PhotonSettings;

use crate::url_utils::{SCHEME_SEPARATOR, is_https, remove_fragment, remove_query, remove_scheme};

/// Output quality. Only affects JPEGs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// 100.
    High,
    /// 65.
    #[default]
    Medium,
    /// 35.
    Low,
}

impl Quality {
    /// Value of the `quality` query parameter.
    #[must_use]
    pub const fn as_param(self) -> u8 {
        match self {
            Self::High => 100,
            Self::Medium => 65,
            Self::Low => 35,
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown quality: {other}")),
        }
    }
}

/// Parameters for one Photon URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhotonRequest {
    /// Target width; 0 leaves it unset.
    pub width: u32,
    /// Target height; 0 leaves it unset.
    pub height: u32,
    /// Output quality.
    pub quality: Quality,
    /// Whether the image lives on a private atomic site.
    pub private_site: bool,
}

impl PhotonRequest {
    /// A medium-quality request for a public site.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            quality: Quality::Medium,
            private_site: false,
        }
    }

    /// Set the quality.
    #[must_use]
    pub const fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Mark the image as living on a private atomic site.
    #[must_use]
    pub const fn with_private_site(mut self, private_site: bool) -> Self {
        self.private_site = private_site;
        self
    }

    /// Photon query parameters, without a leading `?`.
    fn query(&self) -> String {
        // strip=info removes Exif, IPTC and comment data from the output image.
        let mut query = format!("strip=info&quality={}", self.quality.as_param());

        if self.width > 0 && self.height > 0 {
            query.push_str(&format!("&resize={},{}", self.width, self.height));
        } else if self.width > 0 {
            query.push_str(&format!("&w={}", self.width));
        } else if self.height > 0 {
            query.push_str(&format!("&h={}", self.height));
        }

        query
    }
}

/// Whether the URL points at the mshots screenshot service.
#[must_use]
pub fn is_mshots_url(url: &str) -> bool {
    url.contains("/mshots/")
}

/// Builds Photon URLs against a set of proxy hosts.
#[derive(Debug, Clone, Default)]
pub struct PhotonBuilder {
    settings: PhotonSettings,
}

static DEFAULT_BUILDER: std::sync::LazyLock<PhotonBuilder> =
    std::sync::LazyLock::new(PhotonBuilder::default);

impl PhotonBuilder {
    /// Create a builder using the given hosts.
    #[must_use]
    pub const fn new(settings: PhotonSettings) -> Self {
        Self { settings }
    }

    /// The hosts this builder rewrites onto.
    #[must_use]
    pub const fn settings(&self) -> &PhotonSettings {
        &self.settings
    }

    /// Rewrite `image_url` into a Photon URL.
    ///
    /// Returns `""` for empty input and when a private-site URL cannot be
    /// parsed; callers should treat `""` as "no proxy URL available". Input
    /// without a scheme is returned unchanged.
    #[must_use]
    pub fn build(&self, image_url: Option<&str>, request: &PhotonRequest) -> String {
        let Some(image_url) = image_url.filter(|u| !u.is_empty()) else {
            return String::new();
        };

        let Some(scheme_pos) = image_url.find(SCHEME_SEPARATOR) else {
            return image_url.to_string();
        };

        // Some image URLs arrive with a bogus fragment that has to go before
        // the query does.
        let with_query = remove_fragment(image_url);

        // Existing params may conflict with the ones added below.
        let stripped = remove_query(with_query);

        if is_mshots_url(stripped) {
            debug!(url = %stripped, "mshots url, skipping photon");
            return format!("{stripped}?w={}&h={}", request.width, request.height);
        }

        let mut query = request.query();

        if request.private_site {
            return self.private_site_url(stripped, &query);
        }

        let photon = &self.settings;
        if stripped.contains(photon.proxy_domain.as_str())
            && photon
                .proxy_hosts
                .iter()
                .any(|host| stripped.contains(host.as_str()))
        {
            let had_ssl = with_query.find('?').is_some_and(|pos| pos > 0)
                && with_query.contains("ssl=1");
            if had_ssl {
                query.push_str("&ssl=1");
            }
            debug!(url = %stripped, "already a photon url");
            return format!("{stripped}?{query}");
        }

        // The service domain accepts the same params and can serve images
        // from private blogs.
        if stripped.contains(photon.service_domain.as_str()) {
            return format!("{stripped}?{query}");
        }

        if is_https(stripped) {
            query.push_str("&ssl=1");
        }

        match stripped.get(scheme_pos + SCHEME_SEPARATOR.len()..) {
            Some(rest) => format!("https://{}/{rest}?{query}", photon.proxy_host),
            None => {
                warn!(url = %image_url, "scheme separator past end of url, leaving it as is");
                stripped.to_string()
            }
        }
    }

    fn private_site_url(&self, url: &str, query: &str) -> String {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(url = %url, error = %e, "malformed private site image url");
                return String::new();
            }
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            warn!(url = %url, scheme = parsed.scheme(), "private site image url is not http");
            return String::new();
        }
        let Some(slug) = parsed.host_str() else {
            warn!(url = %url, "private site image url has no host");
            return String::new();
        };

        format!(
            "{}{slug}{}?path={}&{query}",
            self.settings.atomic_proxy_prefix,
            self.settings.atomic_proxy_suffix,
            parsed.path()
        )
    }

    /// Bare `w=` resize on the primary proxy host, without quality or
    /// metadata stripping.
    #[must_use]
    pub fn simple_url(&self, image_url: &str, size: u32) -> String {
        format!(
            "http://{}/{}?w={size}",
            self.settings.proxy_host,
            remove_scheme(image_url)
        )
    }
}

/// [`PhotonBuilder::build`] with the default hosts.
#[must_use]
pub fn build_photon_url(image_url: Option<&str>, request: &PhotonRequest) -> String {
    DEFAULT_BUILDER.build(image_url, request)
}

/// [`PhotonBuilder::simple_url`] with the default hosts.
#[must_use]
pub fn simple_photon_url(image_url: &str, size: u32) -> String {
    DEFAULT_BUILDER.simple_url(image_url, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photon(url: &str, width: u32, height: u32) -> String {
        build_photon_url(Some(url), &PhotonRequest::new(width, height))
    }

    #[test]
    fn test_empty_and_schemeless() {
        assert_eq!(build_photon_url(None, &PhotonRequest::new(1, 1)), "");
        assert_eq!(photon("", 100, 50), "");
        assert_eq!(photon("not-a-url", 100, 50), "not-a-url");
        assert_eq!(photon("/relative/a.jpg", 100, 50), "/relative/a.jpg");
    }

    #[test]
    fn test_external_https() {
        assert_eq!(
            photon("https://example.com/a.jpg", 100, 50),
            "https://i0.wp.com/example.com/a.jpg?strip=info&quality=65&resize=100,50&ssl=1"
        );
    }

    #[test]
    fn test_external_http_has_no_ssl() {
        assert_eq!(
            photon("http://example.com/a.jpg", 100, 0),
            "https://i0.wp.com/example.com/a.jpg?strip=info&quality=65&w=100"
        );
    }

    #[test]
    fn test_sizing_params() {
        assert!(photon("http://e.com/a.jpg", 0, 40).ends_with("quality=65&h=40"));
        assert!(photon("http://e.com/a.jpg", 0, 0).ends_with("strip=info&quality=65"));
    }

    #[test]
    fn test_quality_tiers() {
        let url = Some("http://e.com/a.jpg");
        let high = build_photon_url(url, &PhotonRequest::new(0, 0).with_quality(Quality::High));
        let low = build_photon_url(url, &PhotonRequest::new(0, 0).with_quality(Quality::Low));
        assert!(high.contains("quality=100"));
        assert!(low.contains("quality=35"));
    }

    #[test]
    fn test_fragment_and_query_removed() {
        assert_eq!(
            photon("http://e.com/a.jpg?quality=10&strip=all#x", 10, 10),
            "https://i0.wp.com/e.com/a.jpg?strip=info&quality=65&resize=10,10"
        );
    }

    #[test]
    fn test_mshots() {
        assert_eq!(
            photon("https://example.com/mshots/v1/foo?w=1", 200, 100),
            "https://example.com/mshots/v1/foo?w=200&h=100"
        );
    }

    #[test]
    fn test_already_photon_keeps_host() {
        assert_eq!(
            photon("https://i1.wp.com/example.com/a.jpg", 30, 20),
            "https://i1.wp.com/example.com/a.jpg?strip=info&quality=65&resize=30,20"
        );
    }

    #[test]
    fn test_already_photon_preserves_ssl() {
        assert_eq!(
            photon("https://i2.wp.com/example.com/a.jpg?ssl=1&w=5", 30, 0),
            "https://i2.wp.com/example.com/a.jpg?strip=info&quality=65&w=30&ssl=1"
        );
    }

    #[test]
    fn test_other_wp_com_host_is_proxied() {
        assert_eq!(
            photon("https://s0.wp.com/a.png", 10, 0),
            "https://i0.wp.com/s0.wp.com/a.png?strip=info&quality=65&w=10&ssl=1"
        );
    }

    #[test]
    fn test_service_domain_served_directly() {
        assert_eq!(
            photon("https://blog.files.wordpress.com/a.jpg", 10, 0),
            "https://blog.files.wordpress.com/a.jpg?strip=info&quality=65&w=10"
        );
    }

    #[test]
    fn test_private_site() {
        let request = PhotonRequest::new(10, 20).with_private_site(true);
        assert_eq!(
            build_photon_url(Some("https://private.blog/wp-content/a.jpg?x=1"), &request),
            "https://public-api.wordpress.com/wpcom/v2/sites/private.blog/atomic-auth-proxy/file\
             ?path=/wp-content/a.jpg&strip=info&quality=65&resize=10,20"
        );
    }

    #[test]
    fn test_private_site_malformed_host() {
        let request = PhotonRequest::new(10, 20).with_private_site(true);
        assert_eq!(build_photon_url(Some("https://bad host/a.jpg"), &request), "");
    }

    #[test]
    fn test_private_site_rejects_non_http_scheme() {
        let request = PhotonRequest::new(10, 20).with_private_site(true);
        assert_eq!(build_photon_url(Some("foo://x/a.jpg"), &request), "");
        assert_eq!(build_photon_url(Some("ftp://x.test/a.jpg"), &request), "");
        assert!(build_photon_url(Some("HTTP://x.test/a.jpg"), &request).contains("/sites/x.test/"));
    }

    #[test]
    fn test_private_site_normalizes_host_and_path() {
        let request = PhotonRequest::new(0, 0).with_private_site(true);
        assert_eq!(
            build_photon_url(Some("https://Blog.Example/a b.jpg"), &request),
            "https://public-api.wordpress.com/wpcom/v2/sites/blog.example/atomic-auth-proxy/file\
             ?path=/a%20b.jpg&strip=info&quality=65"
        );
    }

    #[test]
    fn test_scheme_past_end_falls_back() {
        // The fragment cut leaves the scheme separator beyond the string.
        assert_eq!(photon("ab#c://d.com/x.jpg", 10, 10), "ab");
    }

    #[test]
    fn test_custom_hosts() {
        let settings = PhotonSettings {
            proxy_host: "img.cdn.test".to_string(),
            ..PhotonSettings::default()
        };
        let builder = PhotonBuilder::new(settings);
        assert_eq!(
            builder.build(Some("http://e.com/a.jpg"), &PhotonRequest::new(5, 0)),
            "https://img.cdn.test/e.com/a.jpg?strip=info&quality=65&w=5"
        );
    }

    #[test]
    fn test_simple_url() {
        assert_eq!(
            simple_photon_url("https://e.com/a.jpg", 64),
            "http://i0.wp.com/e.com/a.jpg?w=64"
        );
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("HIGH".parse::<Quality>(), Ok(Quality::High));
        assert_eq!("low".parse::<Quality>(), Ok(Quality::Low));
        assert!("best".parse::<Quality>().is_err());
    }
}
