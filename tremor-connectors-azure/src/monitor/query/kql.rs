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

/// Renders `value` as a single quoted KQL string literal
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// `{table} | where {column} == '{value}' | order by TimeGenerated desc | limit {limit}`
#[must_use]
pub fn latest_where_equals(table: &str, column: &str, value: &str, limit: usize) -> String {
    format!(
        "{table} | where {column} == {} | order by TimeGenerated desc | limit {limit}",
        quote(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("test-id-1", "'test-id-1'" ; "plain")]
    #[test_case("it's", r"'it\'s'" ; "quote")]
    #[test_case(r"c:\logs", r"'c:\\logs'" ; "backslash")]
    #[test_case("a\nb", r"'a\nb'" ; "newline")]
    #[test_case("", "''" ; "empty")]
    fn quoting(input: &str, expected: &str) {
        assert_eq!(quote(input), expected);
    }

    #[test]
    fn latest_query() {
        assert_eq!(
            latest_where_equals("endtoendlogs_CL", "Message", "test-id-1", 20),
            "endtoendlogs_CL | where Message == 'test-id-1' | order by TimeGenerated desc | limit 20"
        );
    }
}
