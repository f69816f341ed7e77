//! Command handlers
//!
//! 结果（JSON）写入 stdout，日志写入 stderr。

use std::collections::BTreeMap;

use anyhow::Result;
use qcloud_toolkit_api::{resource, ApiClient, ApiResponse, RequestParams, SignedRequest};
use qcloud_toolkit_toolbox::{TaskOutcome, ToolboxService};
use serde_json::json;

use crate::cli::{Commands, RequestArgs};
use crate::config::FileConfig;

/// Run one command. `Ok(false)` means it ran but reported a failure.
pub async fn run(command: Commands, config: &FileConfig) -> Result<bool> {
    match command {
        Commands::Call {
            request,
            concurrency,
        } => {
            let client = build_client(config)?;
            call(&client, &request, concurrency).await
        }
        Commands::Sign { request } => {
            let client = build_client(config)?;
            sign(&client, &request)
        }
        Commands::Render {
            template,
            vars,
            key,
        } => render(&template, &vars, key.as_deref()),
        Commands::CosUrl { url } => cos_url(&url),
        Commands::Actions => {
            actions();
            Ok(true)
        }
    }
}

fn build_client(config: &FileConfig) -> Result<ApiClient> {
    let client = ApiClient::builder(config.credentials()?)
        .config(config.client.clone())
        .build()?;
    Ok(client)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============ call ============

async fn call_region(
    client: &ApiClient,
    args: &RequestArgs,
    params: RequestParams,
    region: Option<String>,
) -> qcloud_toolkit_api::Result<ApiResponse> {
    let options = args.options(region.as_deref());
    match args.descriptor() {
        Some(descriptor) => client.invoke(descriptor, params, options).await,
        None => client.request(&args.action, params, &options).await,
    }
}

async fn call(client: &ApiClient, args: &RequestArgs, concurrency: usize) -> Result<bool> {
    let params = args.request_params()?;
    let targets = args.region_targets();
    let fan_out = targets.len() > 1;

    let results = ToolboxService::map_limit(targets.clone(), concurrency, |region| {
        call_region(client, args, params.clone(), region)
    })
    .await?;

    if !fan_out {
        // 单个地域：直接输出响应，服务端错误码决定退出状态
        return match results.into_iter().next() {
            Some(Ok(response)) => {
                print_json(&response)?;
                if !response.is_success() {
                    tracing::warn!(
                        "{} returned code {}: {}",
                        args.action,
                        response.code,
                        response.message
                    );
                }
                Ok(response.is_success())
            }
            Some(Err(e)) => Err(e.into()),
            None => Ok(true),
        };
    }

    let outcomes: Vec<TaskOutcome> = targets
        .iter()
        .zip(results)
        .map(|(region, result)| {
            let task = json!({ "action": args.action, "region": region });
            match result.and_then(ApiResponse::into_result) {
                Ok(response) => TaskOutcome::success(&task, &response),
                Err(e) => TaskOutcome::fail(&task, e),
            }
        })
        .collect();
    print_json(&outcomes)?;

    let summary = ToolboxService::summarize(&args.action, &outcomes);
    for message in &summary.messages {
        if summary.is_success() {
            tracing::info!("{message}");
        } else {
            tracing::warn!("{message}");
        }
    }
    Ok(summary.is_success())
}

// ============ sign ============

fn describe(request: &SignedRequest) -> serde_json::Value {
    json!({
        "method": request.method(),
        "url": request.url(),
        "service": request.service(),
        "region": request.region(),
        "signatureMethod": request.signature_method(),
        "stringToSign": request.string_to_sign(),
        "signature": request.signature(),
        "params": request.redacted_params(),
    })
}

/// Build the requests `call` would send, one per region target.
fn prepare_all(client: &ApiClient, args: &RequestArgs) -> Result<Vec<SignedRequest>> {
    let params = args.request_params()?;
    let mut prepared = Vec::new();
    for region in args.region_targets() {
        let options = args.options(region.as_deref());
        let request = match args.descriptor() {
            Some(descriptor) => client.prepare_descriptor(descriptor, params.clone(), options)?,
            None => client.prepare(&args.action, params.clone(), &options)?,
        };
        prepared.push(request);
    }
    Ok(prepared)
}

fn sign(client: &ApiClient, args: &RequestArgs) -> Result<bool> {
    let prepared = prepare_all(client, args)?;
    let signed: Vec<serde_json::Value> = prepared.iter().map(describe).collect();
    match signed.as_slice() {
        [single] => print_json(single)?,
        _ => print_json(&signed)?,
    }
    Ok(true)
}

// ============ toolbox ============

fn template_vars(vars: &[(String, String)], key: Option<&str>) -> BTreeMap<String, String> {
    let mut map = key.map(ToolboxService::object_key_vars).unwrap_or_default();
    for (name, value) in vars {
        let placeholder = if name.starts_with("${") {
            name.clone()
        } else {
            format!("${{{name}}}")
        };
        map.insert(placeholder, value.clone());
    }
    map
}

fn render(template: &str, vars: &[(String, String)], key: Option<&str>) -> Result<bool> {
    let rendered = ToolboxService::replace_template(template, &template_vars(vars, key))?;
    println!("{rendered}");
    Ok(true)
}

fn cos_url(url: &str) -> Result<bool> {
    let location = ToolboxService::parse_cos_url(url)?;
    let presigned = ToolboxService::is_presigned_url(url)?;
    if !location.is_cos() {
        tracing::warn!("{url} is not a COS endpoint; only the key was extracted");
    }
    print_json(&json!({
        "bucket": location.bucket,
        "region": location.region,
        "key": location.key,
        "internal": location.internal,
        "presigned": presigned,
    }))?;
    Ok(location.is_cos())
}

fn actions() {
    for descriptor in resource::CATALOG {
        let routing = match (descriptor.regional, descriptor.region_in_host) {
            (true, true) => "regional, region in host",
            (true, false) => "regional",
            _ => "global",
        };
        println!(
            "{:<20} {:<12} {:<5} {routing}",
            descriptor.action,
            descriptor.service,
            descriptor.method.as_str()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use qcloud_toolkit_api::{Credentials, HttpMethod};

    fn request_args(args: &[&str]) -> RequestArgs {
        let argv = std::iter::once("qcloud-toolkit").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Sign { request } | Commands::Call { request, .. } => request,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn test_client() -> ApiClient {
        ApiClient::new(Credentials::new("AKIDtest", "test-key")).unwrap()
    }

    #[test]
    fn sign_routes_descriptor_like_call() {
        let client = test_client();
        let args = request_args(&["sign", "ListQueue", "-p", "Region=sh"]);
        let prepared = prepare_all(&client, &args).unwrap();
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].host(), "cmq-queue-sh.api.qcloud.com");
        assert_eq!(prepared[0].method(), HttpMethod::Post);
        assert_eq!(prepared[0].region(), Some("sh"));
    }

    #[test]
    fn sign_honors_method_for_descriptor() {
        let client = test_client();
        let args = request_args(&["sign", "DescribeProject", "-m", "post"]);
        let prepared = prepare_all(&client, &args).unwrap();
        assert_eq!(prepared[0].method(), HttpMethod::Post);
        assert_eq!(prepared[0].service(), "account");
    }

    #[test]
    fn sign_checks_descriptor_requirements() {
        let client = test_client();
        let args = request_args(&["sign", "DescribeInstances"]);
        assert!(prepare_all(&client, &args).is_err());
    }

    #[test]
    fn sign_one_request_per_region() {
        let client = test_client();
        let args = request_args(&["sign", "DescribeInstances", "-r", "gz", "-r", "sh"]);
        let regions: Vec<_> = prepare_all(&client, &args)
            .unwrap()
            .iter()
            .map(|r| r.region().map(str::to_string))
            .collect();
        assert_eq!(regions, vec![Some("gz".to_string()), Some("sh".to_string())]);
    }

    #[test]
    fn vars_from_key_and_pairs() {
        let vars = template_vars(
            &[
                ("Date".to_string(), "2024-01-01".to_string()),
                ("${Ext}".to_string(), "bak".to_string()),
            ],
            Some("logs/app.log"),
        );
        assert_eq!(vars.get("${Date}").map(String::as_str), Some("2024-01-01"));
        assert_eq!(vars.get("${Ext}").map(String::as_str), Some("bak"));
        assert_eq!(vars.get("${Dir}").map(String::as_str), Some("logs/"));
        assert_eq!(
            ToolboxService::replace_template("${Date}/${BaseName}.${Ext}", &vars).unwrap(),
            "2024-01-01/app.bak"
        );
    }

    #[test]
    fn vars_without_key() {
        let vars = template_vars(&[("Name".to_string(), "x".to_string())], None);
        assert_eq!(vars.len(), 1);
        assert!(vars.contains_key("${Name}"));
    }
}
