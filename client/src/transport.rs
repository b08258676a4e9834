//! Executes core `HttpRequest`s over reqwest.

use eventreg_core::{HttpBody, HttpMethod, HttpRequest, HttpResponse, UploadForm};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::ClientError;

pub(crate) async fn execute(
    http: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, ClientError> {
    let method = match request.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    };
    debug!(method = request.method.as_str(), url = %request.path, "sending request");

    let mut builder = http.request(method, &request.path);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder = match request.body {
        None => builder,
        Some(HttpBody::Json(text)) => builder.body(text),
        Some(HttpBody::Multipart(form)) => {
            builder.multipart(multipart(form).map_err(ClientError::Upload)?)
        }
    };

    let response = builder.send().await.map_err(ClientError::Transport)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.text().await.map_err(ClientError::Transport)?;
    debug!(status, "received response");

    Ok(HttpResponse { status, headers, body })
}

fn multipart(form: UploadForm) -> Result<Form, reqwest::Error> {
    let mut out = Form::new();
    for part in form.parts {
        let file = Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.content_type)?;
        out = out.part(part.field, file);
    }
    Ok(out)
}
