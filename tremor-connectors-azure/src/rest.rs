// Copyright 2024, The Tremor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Result;
use bytes::Bytes;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Request, Response};
use serde_json::{json, Map, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct RequestId(u64);

impl RequestId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) struct RequestMeta {
    method: String,
    url: String,
    headers: HeaderMap,
}

pub(crate) struct ResponseMeta {
    status: u16,
    headers: HeaderMap,
    pub(crate) content_length: usize,
}

// credentials never make it into the logs
fn headers_to_value(headers: &HeaderMap) -> Value {
    let mut map = Map::with_capacity(headers.len());
    for (key, value) in headers {
        let value = if key == AUTHORIZATION {
            let scheme = value
                .to_str()
                .ok()
                .and_then(|v| v.split_whitespace().next())
                .unwrap_or_default();
            format!("{scheme} ***")
        } else {
            String::from_utf8_lossy(value.as_bytes()).to_string()
        };
        map.insert(key.as_str().to_string(), Value::String(value));
    }
    Value::Object(map)
}

impl From<RequestMeta> for Value {
    fn from(meta: RequestMeta) -> Value {
        json!({
            "method": meta.method,
            "url": meta.url,
            "headers": headers_to_value(&meta.headers),
        })
    }
}

impl From<ResponseMeta> for Value {
    fn from(meta: ResponseMeta) -> Value {
        json!({
            "status": meta.status,
            "headers": headers_to_value(&meta.headers),
            "content_length": meta.content_length,
        })
    }
}

pub(crate) fn extract_request_meta(request: &Request) -> RequestMeta {
    RequestMeta {
        method: request.method().to_string(),
        url: request.url().to_string(),
        headers: request.headers().clone(),
    }
}

pub(crate) async fn extract_response_meta(response: Response) -> Result<(ResponseMeta, Bytes)> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let data = response.bytes().await?;

    let meta = ResponseMeta {
        status,
        headers,
        content_length: data.len(),
    };

    Ok((meta, data))
}
