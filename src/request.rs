use std::collections::HashMap;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use reqwest::{Body, Request, Url};
use serde::{Deserialize, Serialize};

use crate::{ErrorKind, Result};

/// Caller-supplied specification of a single HTTP call.
///
/// A description is plain data: the method and URL as strings, a header
/// mapping with one ordered value list per header name, and an optional set
/// of body fields which is sent as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescription {
    /// HTTP method, e.g. `GET` or `POST`
    pub method: String,
    /// Target URL
    pub url: String,
    /// Headers to send with the request.
    ///
    /// These replace anything request construction sets by default,
    /// including `content-type`; supply your own if the target needs one.
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
    /// Body fields, encoded as a JSON object. An absent body encodes as `{}`.
    #[serde(default)]
    pub body: Option<HashMap<String, String>>,
}

impl RequestDescription {
    /// Build a transmission-ready request from this description.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the method, URL or a header is invalid, or if the
    /// body fields cannot be encoded.
    pub fn prepare(&self) -> Result<Request> {
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| ErrorKind::InvalidMethod(self.method.clone()))?;
        let url =
            Url::parse(&self.url).map_err(|e| ErrorKind::ParseUrl(self.url.clone(), e))?;

        let empty = HashMap::new();
        let payload = serde_json::to_vec(self.body.as_ref().unwrap_or(&empty))
            .map_err(ErrorKind::EncodeBody)?;

        let mut request = Request::new(method, url);
        *request.body_mut() = Some(Body::from(payload));
        *request.headers_mut() = self.header_map()?;
        Ok(request)
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, values) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            for value in values {
                headers.append(name.clone(), HeaderValue::from_str(value)?);
            }
        }
        Ok(headers)
    }
}

impl TryFrom<&RequestDescription> for Request {
    type Error = ErrorKind;

    fn try_from(description: &RequestDescription) -> Result<Request> {
        description.prepare()
    }
}

/// Build transmission-ready requests for all `descriptions`, in order.
///
/// This is all-or-nothing: the first malformed description aborts the whole
/// batch with its error, before any network activity has happened.
///
/// # Errors
///
/// Returns an `Err` if any description fails to [`prepare`](RequestDescription::prepare).
pub fn build(descriptions: &[RequestDescription]) -> Result<Vec<Request>> {
    descriptions
        .iter()
        .map(RequestDescription::prepare)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn get(url: &str) -> RequestDescription {
        RequestDescription {
            method: "GET".to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_get() {
        let request = get("https://example.com/path").prepare().unwrap();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().as_str(), "https://example.com/path");
        assert_eq!(request.body().unwrap().as_bytes(), Some(&b"{}"[..]));
        assert!(request.headers().is_empty());
    }

    #[test]
    fn test_prepare_encodes_body_fields() {
        let mut body = HashMap::new();
        body.insert("name".to_string(), "Test API Guy".to_string());
        let description = RequestDescription {
            method: "POST".to_string(),
            url: "https://example.com".to_string(),
            body: Some(body),
            ..Default::default()
        };

        let request = description.prepare().unwrap();
        assert_eq!(
            request.body().unwrap().as_bytes(),
            Some(&br#"{"name":"Test API Guy"}"#[..])
        );
    }

    #[test]
    fn test_prepare_sets_only_given_headers() {
        let mut description = get("https://example.com");
        description.headers.insert(
            "accept".to_string(),
            vec!["application/json".to_string(), "text/html".to_string()],
        );

        let request = description.prepare().unwrap();
        assert_eq!(request.headers().len(), 2);
        let accepted: Vec<_> = request.headers().get_all("accept").iter().collect();
        assert_eq!(accepted, vec!["application/json", "text/html"]);
        assert!(request.headers().get("content-type").is_none());
    }

    #[test]
    fn test_invalid_method() {
        let mut description = get("https://example.com");
        description.method = "GET POST".to_string();
        assert!(matches!(
            description.prepare(),
            Err(ErrorKind::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            get("not a url").prepare(),
            Err(ErrorKind::ParseUrl(_, _))
        ));
    }

    #[test]
    fn test_invalid_header_value() {
        let mut description = get("https://example.com");
        description
            .headers
            .insert("x-broken".to_string(), vec!["line\nbreak".to_string()]);
        assert!(matches!(
            description.prepare(),
            Err(ErrorKind::InvalidHeaderValue(_))
        ));
    }

    #[test]
    fn test_build_preserves_order() {
        let descriptions = vec![
            get("https://example.com/0"),
            get("https://example.com/1"),
            get("https://example.com/2"),
        ];
        let requests = build(&descriptions).unwrap();
        let urls: Vec<_> = requests.iter().map(|r| r.url().path()).collect();
        assert_eq!(urls, vec!["/0", "/1", "/2"]);
    }

    #[test]
    fn test_description_from_json() {
        let description: RequestDescription =
            serde_json::from_str(r#"{"method": "GET", "url": "https://example.com"}"#).unwrap();
        assert_eq!(description.method, "GET");
        assert!(description.headers.is_empty());
        assert_eq!(description.body, None);
    }

    #[test]
    fn test_build_is_all_or_nothing() {
        let descriptions = vec![get("https://example.com"), get("not a url")];
        assert!(matches!(
            build(&descriptions),
            Err(ErrorKind::ParseUrl(_, _))
        ));
    }
}
