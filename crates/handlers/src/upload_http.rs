// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `UploadHttp` — POSTs the handoff's input as a multipart file upload.
//! Grounded on the original `handler/upload_http.go`. Uses `reqwest`'s
//! blocking client rather than its async one since `Handler::handle` is
//! synchronous by design (the pipeline dispatches every handler call onto a
//! blocking-task thread); see SPEC_FULL.md §4.5.1.
//!
//! Not naturally idempotent: recovery re-executing this handler may upload
//! the same bytes twice. Per §4.6 this is accepted at-least-once behavior —
//! dedup, if needed, is the receiving server's responsibility.

use std::io::Read;

use pp_core::{ConfigError, FlowObject};
use pp_engine::{FileHandoff, Handler, HandlerError, HandlerFactory};
use reqwest::blocking::{multipart, Client};
use serde_json::{Map, Value};

pub struct UploadHttpFactory;

impl HandlerFactory for UploadHttpFactory {
    fn kind_tag(&self) -> &'static str {
        "upload_http"
    }

    fn build(&self, id: String, config: &Map<String, Value>) -> Result<Box<dyn Handler>, ConfigError> {
        let url = config
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ConfigError::MissingField("url".to_string()))?
            .to_string();
        let extra_headers = config
            .get("extra_headers")
            .and_then(Value::as_object)
            .map(|headers| {
                headers
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        let write_response_to_metadata =
            config.get("write_response_to_metadata").and_then(Value::as_bool).unwrap_or(false);
        Ok(Box::new(UploadHttp { id, url, extra_headers, write_response_to_metadata }))
    }
}

struct UploadHttp {
    id: String,
    url: String,
    extra_headers: Vec<(String, String)>,
    write_response_to_metadata: bool,
}

impl Handler for UploadHttp {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "UploadHttp"
    }

    fn handle(&self, mut flow: FlowObject, handoff: &mut FileHandoff) -> Result<FlowObject, HandlerError> {
        let url = pp_expr::evaluate(&self.url, &flow.metadata)?;
        let mut data = Vec::new();
        handoff.read()?.read_to_end(&mut data)?;

        let part = multipart::Part::bytes(data).file_name("upload");
        let form = multipart::Form::new().part("file", part);

        let client = Client::new();
        let mut request = client.post(&url).multipart(form);
        for (key, value_expr) in &self.extra_headers {
            let value = pp_expr::evaluate(value_expr, &flow.metadata)?;
            request = request.header(key, value);
        }

        let response = request.send().map_err(|e| HandlerError::Http(e.to_string()))?;
        let status = response.status();

        flow.set("UploadHttp.url", url.clone());
        flow.set("UploadHttp.response_status", status.as_u16());

        if !status.is_success() {
            return Err(HandlerError::Http(format!("upload to {url} failed with status {status}")));
        }

        if self.write_response_to_metadata {
            let body = response.text().map_err(|e| HandlerError::Http(e.to_string()))?;
            flow.set("UploadHttp.response_body", body);
        }

        Ok(flow)
    }
}

#[cfg(test)]
#[path = "upload_http_tests.rs"]
mod tests;
