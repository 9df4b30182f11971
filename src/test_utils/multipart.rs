use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};

const BOUNDARY: &str = "ECONO_BOUNDARY_0123456789";

/// One part of a multipart form.
pub(crate) enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Build the body of a `multipart/form-data` request from `parts`.
pub(crate) fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());

        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"cupom.jpg\"\r\n\
                        Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }

        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    body
}

/// The content type header value matching [multipart_body].
pub(crate) fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Build a [Multipart] extractor as if `parts` were posted by a browser.
pub(crate) async fn must_make_multipart(parts: &[FormPart<'_>]) -> Multipart {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(CONTENT_TYPE, multipart_content_type())
        .body(multipart_body(parts).into())
        .unwrap();

    Multipart::from_request(request, &{}).await.unwrap()
}
