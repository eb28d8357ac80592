// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use reqwest::Response;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ResponseError;
use crate::json_diff::Config;
use crate::Report;

/// Parses `body` as JSON and matches it against `expected`.
pub fn matches_str<T>(body: &str, expected: &T, config: &Config) -> Result<Report, ResponseError>
where
    T: ?Sized + Serialize,
{
    let actual = serde_json::from_str::<Value>(body)?;
    Ok(crate::matches(&actual, expected, config)?)
}

/// Parses `body` as JSON and validates it against `expected`.
pub fn validate_str<T>(body: &str, expected: &T, config: &Config) -> Result<(), ResponseError>
where
    T: ?Sized + Serialize,
{
    Ok(matches_str(body, expected, config)?.into_result()?)
}

/// Reads the body of `response` and matches it against `expected`.
///
/// # Examples
///
/// ```no_run
/// use json_conform::{matches_response, Config};
/// use serde_json::json;
///
/// async fn test() {
///     let response = reqwest::get("http://localhost:8080/heroes/1").await.unwrap();
///     let report = matches_response(response, &json!({ "name": "Jenny Doe" }), &Config::default())
///         .await
///         .unwrap();
///     assert!(report.is_match(), "{}", report);
/// }
/// ```
pub async fn matches_response<T>(
    response: Response,
    expected: &T,
    config: &Config,
) -> Result<Report, ResponseError>
where
    T: ?Sized + Serialize,
{
    debug!(status = response.status().as_u16(), url = %response.url(), "reading response body");
    let body = response.text().await?;
    matches_str(&body, expected, config)
}

/// Reads the body of `response` and validates it against `expected`.
pub async fn validate_response<T>(
    response: Response,
    expected: &T,
    config: &Config,
) -> Result<(), ResponseError>
where
    T: ?Sized + Serialize,
{
    Ok(matches_response(response, expected, config)
        .await?
        .into_result()?)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::*;
    use crate::error::{NormalizeError, ValidationError};
    use crate::json_diff::CompareMode;

    #[derive(Serialize)]
    struct Hero {
        id: i64,
        name: &'static str,
    }

    const HEROES_ENDPOINT: &str = "/heroes/1";
    const HEADER_NAME: &str = "Content-Type";
    const HEADER_VALUE: &str = "application/json";

    async fn get(server: &mockito::Server) -> Response {
        reqwest::get(format!("{}{}", server.url(), HEROES_ENDPOINT))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_matches_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", HEROES_ENDPOINT)
            .with_header(HEADER_NAME, HEADER_VALUE)
            .with_status(200)
            .with_body(r#"{"id": 1, "name": "Jenny Doe", "level": 2}"#)
            .create_async()
            .await;

        let expected = Hero {
            id: 1,
            name: "Jenny Doe",
        };

        let report = matches_response(get(&server).await, &expected, &Config::default())
            .await
            .unwrap();
        assert!(report.is_match());

        let report = matches_response(
            get(&server).await,
            &expected,
            &Config::new(CompareMode::Strict),
        )
        .await
        .unwrap();
        assert_eq!(
            report.errors(),
            &["Excess found in the JSON document: '$.level'".to_string()]
        );
    }

    #[tokio::test]
    async fn test_validate_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", HEROES_ENDPOINT)
            .with_status(200)
            .with_body(r#"{"id": 2, "name": "Jenny Smith"}"#)
            .create_async()
            .await;

        let expected = Hero {
            id: 1,
            name: "Jenny Doe",
        };

        let result = validate_response(get(&server).await, &expected, &Config::default()).await;
        match result {
            Err(ResponseError::Validation(ValidationError::Failed(failed))) => {
                assert_eq!(
                    failed.errors,
                    vec![
                        "Value for '$.id' was '2' but should have been '1'",
                        "Value for '$.name' was 'Jenny Smith' but should have been 'Jenny Doe'",
                    ]
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_response_not_json() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", HEROES_ENDPOINT)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let result = matches_response(get(&server).await, &json!({}), &Config::default()).await;
        assert!(matches!(result, Err(ResponseError::Parse(_))));
    }

    #[test]
    fn test_str_body() {
        let body = r#"{"id": 1, "name": "Jenny Doe"}"#;
        let expected = Hero {
            id: 1,
            name: "Jenny Doe",
        };
        assert!(validate_str(body, &expected, &Config::default()).is_ok());

        let result = validate_str(body, &json!({ "name": "Jenny Smith" }), &Config::default());
        assert!(matches!(
            result,
            Err(ResponseError::Validation(ValidationError::Failed(_)))
        ));

        let result = matches_str(body, &vec![1u8], &Config::default());
        assert!(matches!(
            result,
            Err(ResponseError::Validation(ValidationError::Normalize(
                NormalizeError::UnsupportedType("u8")
            )))
        ));
    }
}
