//! Request parameters
//!
//! Flattened query/form fields plus the optional uploaded file.

use std::collections::HashMap;

use crate::error::ConnectorError;

/// One uploaded file (`files` multipart field)
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Parameters of one connector request
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
    upload: Option<Upload>,
    xhr: bool,
}

impl Params {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Marks the request as issued by `XMLHttpRequest`
    pub fn with_xhr(mut self, xhr: bool) -> Self {
        self.xhr = xhr;
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// A required, non-empty value; `message` becomes the error title.
    pub fn require(&self, key: &str, message: &str) -> Result<&str, ConnectorError> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConnectorError::MissingParameter(message.to_string())),
        }
    }

    pub fn mode(&self) -> Option<&str> {
        self.get("mode")
    }

    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    pub fn is_xhr(&self) -> bool {
        self.xhr
    }

    /// `thumbnail=true` on getimage
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }
}
