//! Region and service routing checks.

/// Built-in regions: legacy short code and long form.
const REGIONS: &[(&str, &str)] = &[
    ("gz", "ap-guangzhou"),
    ("gzopen", "ap-guangzhou-open"),
    ("sh", "ap-shanghai"),
    ("shjr", "ap-shanghai-fsi"),
    ("bj", "ap-beijing"),
    ("tsn", "ap-tianjin"),
    ("nj", "ap-nanjing"),
    ("cd", "ap-chengdu"),
    ("cq", "ap-chongqing"),
    ("szjr", "ap-shenzhen-fsi"),
    ("hk", "ap-hongkong"),
    ("sg", "ap-singapore"),
    ("th", "ap-bangkok"),
    ("jkt", "ap-jakarta"),
    ("in", "ap-mumbai"),
    ("kr", "ap-seoul"),
    ("jp", "ap-tokyo"),
    ("usw", "na-siliconvalley"),
    ("use", "na-ashburn"),
    ("ca", "na-toronto"),
    ("sao", "sa-saopaulo"),
    ("de", "eu-frankfurt"),
    ("ru", "eu-moscow"),
];

/// Long form of a region (`gz` → `ap-guangzhou`); long forms map to themselves.
pub fn long_region_name(region: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(short, long)| *short == region || *long == region)
        .map(|(_, long)| *long)
}

/// Whether the region is routable: built-in or listed in `extra`.
pub fn is_known_region(region: &str, extra: &[String]) -> bool {
    long_region_name(region).is_some() || extra.iter().any(|r| r == region)
}

/// Service labels become the first DNS label of the host (`cvm` → `cvm.api.qcloud.com`).
///
/// Lowercase ASCII letters, digits and `-`, starting with a letter.
pub fn is_valid_service_label(service: &str) -> bool {
    let mut chars = service.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && !service.ends_with('-')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
