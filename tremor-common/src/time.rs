// Copyright 2020-2024, The Tremor Team
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
use chrono::{DateTime, Utc};

/// RFC 1123 format as used by HTTP `Date` style headers, always in GMT
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// The current time formatted as an RFC 1123 HTTP date, e.g. `Mon, 27 Jul 2020 10:00:00 GMT`
#[must_use]
pub fn http_date() -> String {
    format_http_date(&Utc::now())
}

/// Formats the given instant as an RFC 1123 HTTP date
#[must_use]
pub fn format_http_date(at: &DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}
