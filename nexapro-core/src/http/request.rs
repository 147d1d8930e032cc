//! Request description replayable across the refresh-retry cycle

use crate::domain::Params;
use crate::error::Result;
use reqwest::Method;
use serde::Serialize;

/// File attached to a multipart request
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Multipart body. Kept as plain data so it can be rebuilt for a replay.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub(crate) fn to_form(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let mut part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime)?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// A single backend call.
///
/// `retried` marks a request that has already been replayed after a token
/// refresh; such a request never triggers another refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Params,
    pub body: Option<RequestBody>,
    pub(crate) retried: bool,
    pub(crate) bearer_override: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            body: None,
            retried: false,
            bearer_override: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, params: &Params) -> Self {
        self.query
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Opt out of the refresh-retry cycle. Used by the token endpoints
    /// themselves, where a 401 means bad credentials, not an expired session.
    pub fn without_refresh(mut self) -> Self {
        self.retried = true;
        self
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self, access_token: String) {
        self.retried = true;
        self.bearer_override = Some(access_token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let mut params = Params::new();
        params.insert("status".to_string(), "vacant".to_string());

        let request = ApiRequest::get("/units/").query(&params);
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query.get("status").map(String::as_str),
            Some("vacant")
        );
        assert!(!request.is_retried());
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/owners/")
            .json(&json!({"name": "Jane"}))
            .unwrap();
        match request.body {
            Some(RequestBody::Json(body)) => assert_eq!(body["name"], "Jane"),
            _ => panic!("expected a JSON body"),
        }
    }

    #[test]
    fn test_without_refresh_marks_retried() {
        let request = ApiRequest::post("/auth/token/").without_refresh();
        assert!(request.is_retried());
    }

    #[test]
    fn test_multipart_rebuilds() {
        let form = MultipartForm::new().text("name", "sig").file(FilePart {
            field: "signature".to_string(),
            file_name: "sig.png".to_string(),
            mime: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        });
        assert!(form.to_form().is_ok());
        assert!(form.to_form().is_ok());
    }

    #[test]
    fn test_multipart_bad_mime() {
        let form = MultipartForm::new().file(FilePart {
            field: "f".to_string(),
            file_name: "f".to_string(),
            mime: Some("not a mime".to_string()),
            bytes: vec![],
        });
        assert!(form.to_form().is_err());
    }
}
