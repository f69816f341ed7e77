//! Endpoint descriptors.
//!
//! Every endpoint is a plain [`ResourceDescriptor`] value interpreted by
//! [`ApiClient::invoke`](crate::ApiClient::invoke); adding an endpoint means
//! adding a constant, not a type.

use crate::types::HttpMethod;

/// One callable API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Service label (`cvm`, `account`, ...).
    pub service: &'static str,
    /// Action name.
    pub action: &'static str,
    pub method: HttpMethod,
    /// Parameters that must be present (and not `Undefined`).
    pub required_params: &'static [&'static str],
    /// Whether a region is mandatory.
    pub regional: bool,
    /// Whether the region is part of the host label (`cmq-queue-gz.api.qcloud.com`).
    pub region_in_host: bool,
}

impl ResourceDescriptor {
    /// Service label to route to for `region`.
    pub fn service_label(&self, region: Option<&str>) -> String {
        match region {
            Some(region) if self.region_in_host => format!("{}-{region}", self.service),
            _ => self.service.to_string(),
        }
    }
}

/// 账号下的项目列表
pub const DESCRIBE_PROJECT: ResourceDescriptor = ResourceDescriptor {
    service: "account",
    action: "DescribeProject",
    method: HttpMethod::Get,
    required_params: &[],
    regional: false,
    region_in_host: false,
};

/// 云服务器实例列表
pub const DESCRIBE_INSTANCES: ResourceDescriptor = ResourceDescriptor {
    service: "cvm",
    action: "DescribeInstances",
    method: HttpMethod::Get,
    required_params: &[],
    regional: true,
    region_in_host: false,
};

/// 可用地域列表
pub const DESCRIBE_REGIONS: ResourceDescriptor = ResourceDescriptor {
    service: "cvm",
    action: "DescribeRegions",
    method: HttpMethod::Get,
    required_params: &[],
    regional: true,
    region_in_host: false,
};

/// CMQ 队列列表
pub const LIST_QUEUE: ResourceDescriptor = ResourceDescriptor {
    service: "cmq-queue",
    action: "ListQueue",
    method: HttpMethod::Post,
    required_params: &[],
    regional: true,
    region_in_host: true,
};

/// All built-in descriptors.
pub const CATALOG: &[ResourceDescriptor] = &[
    DESCRIBE_PROJECT,
    DESCRIBE_INSTANCES,
    DESCRIBE_REGIONS,
    LIST_QUEUE,
];

/// Look up a descriptor by action name (first match).
pub fn find_by_action(action: &str) -> Option<&'static ResourceDescriptor> {
    CATALOG.iter().find(|d| d.action == action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(find_by_action("DescribeProject"), Some(&DESCRIBE_PROJECT));
        assert_eq!(
            find_by_action("ListQueue").map(|d| d.service),
            Some("cmq-queue")
        );
        assert!(find_by_action("Nope").is_none());
    }

    #[test]
    fn service_label_with_region_in_host() {
        assert_eq!(LIST_QUEUE.service_label(Some("gz")), "cmq-queue-gz");
        assert_eq!(DESCRIBE_INSTANCES.service_label(Some("gz")), "cvm");
        assert_eq!(LIST_QUEUE.service_label(None), "cmq-queue");
    }
}
