//! Command line definitions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qcloud_toolkit_api::{
    resource, HttpMethod, ParamValue, RequestOptions, RequestParams, SignatureMethod,
};

use crate::config::CONFIG_ENV;

#[derive(Debug, Parser)]
#[command(name = "qcloud-toolkit", version, about = "Signed qcloud v2 API calls and COS helpers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign and send an API request
    Call {
        #[command(flatten)]
        request: RequestArgs,

        /// Maximum number of regions queried at the same time
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Print the signed request without sending it
    Sign {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Render an object key template such as `backup/${Dir}/${BaseName}.bak`
    Render {
        template: String,

        /// Template variable, `Name=value` or `${Name}=value`
        #[arg(short = 'v', long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,

        /// Source object key; provides ${Key} ${Dir} ${Name} ${BaseName} ${Ext}
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Parse a COS object URL
    CosUrl { url: String },
    /// List built-in actions
    Actions,
}

#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// Action name, e.g. DescribeInstances
    pub action: String,

    /// Service label (`cvm`, `account`, ...); looked up from built-in actions when omitted
    #[arg(short, long)]
    pub service: Option<String>,

    /// Region; repeat to query several regions
    #[arg(short, long = "region")]
    pub regions: Vec<String>,

    /// get or post
    #[arg(short, long)]
    pub method: Option<HttpMethod>,

    /// sha1 or sha256
    #[arg(long)]
    pub signature_method: Option<SignatureMethod>,

    /// Request parameter `KEY=VALUE`; VALUE is read as JSON when it parses, as a string otherwise
    #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Request parameters as one JSON object, applied before --param
    #[arg(long = "params", value_name = "JSON")]
    pub params_json: Option<String>,
}

impl RequestArgs {
    pub fn request_params(&self) -> Result<RequestParams> {
        let mut params = match &self.params_json {
            Some(json) => {
                let value: serde_json::Value =
                    serde_json::from_str(json).context("--params is not valid JSON")?;
                RequestParams::try_from(value)?
            }
            None => RequestParams::new(),
        };
        for (key, value) in &self.params {
            params.set(key.as_str(), parse_param_value(value));
        }
        Ok(params)
    }

    /// Built-in descriptor for the action, used only when no service was given.
    pub fn descriptor(&self) -> Option<&'static resource::ResourceDescriptor> {
        if self.service.is_some() {
            return None;
        }
        resource::find_by_action(&self.action)
    }

    pub fn options(&self, region: Option<&str>) -> RequestOptions {
        RequestOptions {
            service_type: self.service.clone(),
            method: self.method,
            signature_method: self.signature_method,
            region: region.map(str::to_string),
            path: None,
        }
    }

    /// `[None]` when no region was given, so the configured default applies.
    pub fn region_targets(&self) -> Vec<Option<String>> {
        if self.regions.is_empty() {
            vec![None]
        } else {
            self.regions.iter().cloned().map(Some).collect()
        }
    }
}

pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

pub fn parse_param_value(raw: &str) -> ParamValue {
    serde_json::from_str::<serde_json::Value>(raw)
        .map_or_else(|_| ParamValue::from(raw), ParamValue::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("qcloud-toolkit").chain(args.iter().copied()))
            .unwrap()
    }

    fn request_args(cli: Cli) -> RequestArgs {
        match cli.command {
            Commands::Call { request, .. } | Commands::Sign { request } => request,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn key_value() {
        assert_eq!(
            parse_key_value("Limit=20"),
            Ok(("Limit".to_string(), "20".to_string()))
        );
        assert_eq!(
            parse_key_value("Name=a=b"),
            Ok(("Name".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_key_value("Empty="),
            Ok(("Empty".to_string(), String::new()))
        );
        assert!(parse_key_value("=x").is_err());
        assert!(parse_key_value("novalue").is_err());
    }

    #[test]
    fn param_values() {
        assert_eq!(parse_param_value("20"), ParamValue::from(20));
        assert_eq!(parse_param_value("true"), ParamValue::from(true));
        assert_eq!(parse_param_value("ins-1"), ParamValue::from("ins-1"));
        assert_eq!(
            parse_param_value(r#"["a","b"]"#),
            ParamValue::from(vec!["a", "b"])
        );
    }

    #[test]
    fn call_arguments() {
        let cli = parse(&[
            "call",
            "DescribeInstances",
            "-s",
            "cvm",
            "-r",
            "gz",
            "--region",
            "sh",
            "-m",
            "post",
            "--signature-method",
            "sha256",
            "-p",
            "Limit=20",
            "--concurrency",
            "2",
        ]);
        let Commands::Call {
            request,
            concurrency,
        } = cli.command
        else {
            panic!("expected call");
        };
        assert_eq!(concurrency, 2);
        assert_eq!(request.action, "DescribeInstances");
        assert_eq!(request.service.as_deref(), Some("cvm"));
        assert_eq!(request.regions, vec!["gz", "sh"]);
        assert_eq!(request.method, Some(HttpMethod::Post));
        assert_eq!(request.signature_method, Some(SignatureMethod::HmacSha256));
        assert_eq!(
            request.region_targets(),
            vec![Some("gz".to_string()), Some("sh".to_string())]
        );

        let options = request.options(Some("gz"));
        assert_eq!(options.service_type.as_deref(), Some("cvm"));
        assert_eq!(options.region.as_deref(), Some("gz"));
    }

    #[test]
    fn bad_method_is_rejected() {
        assert!(Cli::try_parse_from(["qcloud-toolkit", "sign", "X", "-m", "put"]).is_err());
    }

    #[test]
    fn params_merge_json_then_pairs() {
        let request = request_args(parse(&[
            "sign",
            "DescribeInstances",
            "--params",
            r#"{"Limit": 10, "InstanceIds": ["ins-1"]}"#,
            "-p",
            "Limit=20",
        ]));
        let params = request.request_params().unwrap();
        assert_eq!(params.get("Limit"), Some(&ParamValue::from(20)));
        assert_eq!(
            params.get("InstanceIds"),
            Some(&ParamValue::from(vec!["ins-1"]))
        );
    }

    #[test]
    fn params_json_must_be_an_object() {
        let request = request_args(parse(&["sign", "X", "--params", "[1]"]));
        assert!(request.request_params().is_err());
        let request = request_args(parse(&["sign", "X", "--params", "{"]));
        assert!(request.request_params().is_err());
    }

    #[test]
    fn descriptor_lookup_only_without_service() {
        let request = request_args(parse(&["call", "ListQueue"]));
        assert_eq!(request.descriptor().map(|d| d.service), Some("cmq-queue"));
        assert_eq!(request.region_targets(), vec![None]);

        let request = request_args(parse(&["call", "ListQueue", "-s", "cmq-queue-gz"]));
        assert!(request.descriptor().is_none());
    }
}
