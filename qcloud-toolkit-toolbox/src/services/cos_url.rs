//! COS object URL parsing.
//!
//! Recognised hosts:
//!
//! - `<bucket>.cos.<region>.myqcloud.com`
//! - `<bucket>.cos-internal.<region>.myqcloud.com`
//! - `<bucket>.cos.<region>.tencentcos.cn`
//! - `<bucket>.cos-internal.<region>.tencentcos.cn`

use url::Url;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::CosObjectLocation;

/// Query parameter present on presigned COS URLs.
const SIGNATURE_QUERY_PARAM: &str = "q-signature";

const COS_DOMAINS: &[(&str, &str)] = &[("myqcloud", "com"), ("tencentcos", "cn")];

fn parse(url: &str) -> ToolboxResult<Url> {
    Url::parse(url.trim()).map_err(|e| ToolboxError::InvalidUrl(format!("{url}: {e}")))
}

/// Split a COS host into `(bucket, region, internal)`.
fn split_cos_host(host: &str) -> Option<(&str, &str, bool)> {
    let labels: Vec<&str> = host.split('.').collect();
    let [bucket, endpoint, region, domain, tld] = labels.as_slice() else {
        return None;
    };
    if !COS_DOMAINS.iter().any(|(d, t)| d == domain && t == tld) {
        return None;
    }
    let internal = match *endpoint {
        "cos" => false,
        "cos-internal" => true,
        _ => return None,
    };
    Some((*bucket, *region, internal))
}

/// Extract bucket, region and key from a COS object URL.
///
/// Hosts that are not COS endpoints still yield the decoded key, with empty
/// bucket and region. Anything after a `?` in the decoded key is dropped.
pub fn parse_cos_url(url: &str) -> ToolboxResult<CosObjectLocation> {
    let parsed = parse(url)?;
    let host = parsed.host_str().unwrap_or_default();

    let (bucket, region, internal) = split_cos_host(host).unwrap_or(("", "", false));

    let raw_path = parsed.path().strip_prefix('/').unwrap_or(parsed.path());
    let decoded = urlencoding::decode(raw_path)
        .map_err(|e| ToolboxError::InvalidUrl(format!("{url}: key is not valid UTF-8: {e}")))?;
    let key = match decoded.find('?') {
        Some(idx) => decoded[..idx].to_string(),
        None => decoded.into_owned(),
    };

    log::debug!("Parsed COS url: bucket={bucket}, region={region}, key={key}");

    Ok(CosObjectLocation {
        bucket: bucket.to_string(),
        region: region.to_string(),
        key,
        internal,
    })
}

/// Whether the URL already carries a COS signature (`q-signature` query parameter).
pub fn is_presigned_url(url: &str) -> ToolboxResult<bool> {
    let parsed = parse(url)?;
    let presigned = parsed
        .query_pairs()
        .any(|(name, _)| name == SIGNATURE_QUERY_PARAM);
    Ok(presigned)
}

/// Public URL of an object on the default `myqcloud.com` endpoint.
///
/// Each key segment is percent-encoded, `/` separators are kept.
pub fn cos_object_url(bucket: &str, region: &str, key: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("https://{bucket}.cos.{region}.myqcloud.com/{encoded_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_endpoint() {
        let loc = parse_cos_url(
            "https://examplebucket-1250000000.cos.ap-guangzhou.myqcloud.com/photos/cat.jpg",
        )
        .unwrap();
        assert_eq!(loc.bucket, "examplebucket-1250000000");
        assert_eq!(loc.region, "ap-guangzhou");
        assert_eq!(loc.key, "photos/cat.jpg");
        assert!(!loc.internal);
        assert!(loc.is_cos());
    }

    #[test]
    fn internal_endpoint() {
        let loc = parse_cos_url(
            "http://examplebucket-1250000000.cos-internal.ap-shanghai.myqcloud.com/a.txt",
        )
        .unwrap();
        assert_eq!(loc.region, "ap-shanghai");
        assert!(loc.internal);
    }

    #[test]
    fn tencentcos_endpoints() {
        let loc =
            parse_cos_url("https://b-1250000000.cos.ap-beijing.tencentcos.cn/k").unwrap();
        assert_eq!(loc.bucket, "b-1250000000");
        assert_eq!(loc.region, "ap-beijing");

        let loc = parse_cos_url("https://b-1250000000.cos-internal.ap-beijing.tencentcos.cn/k")
            .unwrap();
        assert!(loc.internal);
        assert_eq!(loc.key, "k");
    }

    #[test]
    fn key_is_decoded_and_query_dropped() {
        let loc = parse_cos_url(
            "https://b-1.cos.ap-guangzhou.myqcloud.com/dir/%E7%8C%AB%20cat.jpg?q-sign-algorithm=sha1",
        )
        .unwrap();
        assert_eq!(loc.key, "dir/猫 cat.jpg");
    }

    #[test]
    fn encoded_question_mark_truncates_key() {
        let loc = parse_cos_url("https://b-1.cos.ap-guangzhou.myqcloud.com/a%3Fb").unwrap();
        assert_eq!(loc.key, "a");
    }

    #[test]
    fn other_host_keeps_key_only() {
        let loc = parse_cos_url("https://example.com/some/file.bin").unwrap();
        assert_eq!(loc.bucket, "");
        assert_eq!(loc.region, "");
        assert_eq!(loc.key, "some/file.bin");
        assert!(!loc.is_cos());
    }

    #[test]
    fn lookalike_hosts_are_rejected() {
        for host in [
            "https://b.cos.ap-guangzhou.myqcloud.com.evil.com/k",
            "https://x.b.cos.ap-guangzhou.myqcloud.com/k",
            "https://b.cdn.ap-guangzhou.myqcloud.com/k",
        ] {
            assert!(!parse_cos_url(host).unwrap().is_cos(), "{host}");
        }
    }

    #[test]
    fn invalid_url() {
        assert!(matches!(
            parse_cos_url("not a url"),
            Err(ToolboxError::InvalidUrl(_))
        ));
    }

    #[test]
    fn presigned_detection() {
        assert!(is_presigned_url(
            "https://b-1.cos.ap-guangzhou.myqcloud.com/k?q-sign-algorithm=sha1&q-signature=abc"
        )
        .unwrap());
        assert!(!is_presigned_url("https://b-1.cos.ap-guangzhou.myqcloud.com/k").unwrap());
        assert!(!is_presigned_url("https://b-1.cos.ap-guangzhou.myqcloud.com/k?x=q-signature")
            .unwrap());
    }

    #[test]
    fn object_url_round_trip() {
        let url = cos_object_url("b-1250000000", "ap-guangzhou", "dir/猫 cat.jpg");
        assert_eq!(
            url,
            "https://b-1250000000.cos.ap-guangzhou.myqcloud.com/dir/%E7%8C%AB%20cat.jpg"
        );
        let loc = parse_cos_url(&url).unwrap();
        assert_eq!(loc.key, "dir/猫 cat.jpg");
        assert_eq!(loc.bucket, "b-1250000000");
    }
}
