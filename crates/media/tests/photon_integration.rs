//! Photon URL integration tests.
//!
//! Exercises the public API the way the app does: arbitrary image URLs from
//! post content go in, and the result must be either a usable proxy URL or a
//! well-defined fallback.

#![allow(clippy::unwrap_used)]

use wputils_common::{PhotonSettings, Settings};
use wputils_media::{PhotonBuilder, PhotonRequest, Quality, build_photon_url};

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// =============================================================================
// Generic external images
// =============================================================================

mod external {
    use super::*;

    #[test]
    fn test_resize_quality_and_strip_present() {
        let url = build_photon_url(
            Some("https://example.com/a.jpg"),
            &PhotonRequest::new(100, 50),
        );
        assert!(url.starts_with("https://i0.wp.com/example.com/a.jpg?"));
        assert!(url.contains("resize=100,50"));
        assert!(url.contains("quality=65"));
        assert!(url.contains("strip=info"));
        assert!(!url.contains("https://example.com"));
    }

    #[test]
    fn test_existing_params_never_duplicated() {
        let inputs = [
            "https://example.com/a.jpg?quality=10&strip=all",
            "https://i0.wp.com/example.com/a.jpg?strip=info&quality=65&ssl=1",
            "https://blog.wordpress.com/a.jpg?quality=1&strip=none",
            "http://example.com/a.jpg?strip=info#quality=3",
        ];
        for input in inputs {
            let url = build_photon_url(Some(input), &PhotonRequest::new(10, 10));
            assert_eq!(count(&url, "quality="), 1, "{url}");
            assert_eq!(count(&url, "strip="), 1, "{url}");
            assert!(count(&url, "ssl=1") <= 1, "{url}");
            assert_eq!(count(&url, "?"), 1, "{url}");
        }
    }

    #[test]
    fn test_rebuilding_output_is_stable() {
        let request = PhotonRequest::new(64, 64).with_quality(Quality::Low);
        let once = build_photon_url(Some("https://example.com/a.jpg"), &request);
        let twice = build_photon_url(Some(once.as_str()), &request);
        assert_eq!(once, twice);
    }
}

// =============================================================================
// Special URL shapes
// =============================================================================

mod shapes {
    use super::*;

    #[test]
    fn test_malformed_input_fallbacks() {
        let request = PhotonRequest::new(100, 50);
        assert_eq!(build_photon_url(Some(""), &request), "");
        assert_eq!(build_photon_url(None, &request), "");
        assert_eq!(build_photon_url(Some("not-a-url"), &request), "not-a-url");
    }

    #[test]
    fn test_mshots_gets_only_dimensions() {
        let url = build_photon_url(
            Some("https://example.com/mshots/v1/foo"),
            &PhotonRequest::new(200, 100).with_quality(Quality::High),
        );
        assert_eq!(url, "https://example.com/mshots/v1/foo?w=200&h=100");
    }

    #[test]
    fn test_private_site_failure_is_empty() {
        let request = PhotonRequest::new(1, 1).with_private_site(true);
        assert_eq!(build_photon_url(Some("https://exa mple.com/a.jpg"), &request), "");
        assert_eq!(build_photon_url(Some("https://[::1/a.jpg"), &request), "");
        assert_eq!(build_photon_url(Some("foo://x/a.jpg"), &request), "");
    }

    #[test]
    fn test_private_site_mshots_short_circuits_first() {
        let request = PhotonRequest::new(3, 4).with_private_site(true);
        assert_eq!(
            build_photon_url(Some("https://s.wp.com/mshots/v1/x"), &request),
            "https://s.wp.com/mshots/v1/x?w=3&h=4"
        );
    }
}

// =============================================================================
// Configured hosts
// =============================================================================

mod configured {
    use super::*;

    #[test]
    fn test_builder_from_settings_document() {
        let settings = Settings::from_toml_str(
            r#"
            [photon]
            proxy_host = "i2.wp.com"
            "#,
        )
        .unwrap();
        let builder = PhotonBuilder::new(settings.photon);
        let url = builder.build(Some("http://example.com/a.jpg"), &PhotonRequest::new(0, 9));
        assert_eq!(url, "https://i2.wp.com/example.com/a.jpg?strip=info&quality=65&h=9");
    }

    #[test]
    fn test_private_proxy_prefix_is_configurable() {
        let builder = PhotonBuilder::new(PhotonSettings {
            atomic_proxy_prefix: "https://proxy.test/sites/".to_string(),
            atomic_proxy_suffix: "/file".to_string(),
            ..PhotonSettings::default()
        });
        let url = builder.build(
            Some("https://site.test/a.jpg"),
            &PhotonRequest::new(0, 0).with_private_site(true),
        );
        assert_eq!(
            url,
            "https://proxy.test/sites/site.test/file?path=/a.jpg&strip=info&quality=65"
        );
    }
}
