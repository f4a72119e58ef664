//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::relay;
use mediarelay_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mediarelay API",
        version = "0.1.0",
        description = "Media catalog and streaming relay. Stream requests forward `Range` to the origin object store and relay the bytes back without buffering."
    ),
    paths(
        handlers::media_get::list_media,
        handlers::media_get::get_media,
        handlers::media_stream::stream_media,
    ),
    components(
        schemas(
            models::MediaRecord,
            models::MediaKind,
            error::ErrorResponse,
            relay::UpstreamErrorBody,
        )
    ),
    tags(
        (name = "media", description = "Media catalog and streaming")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_media_route() {
        let spec = get_openapi_spec();
        for path in ["/media", "/media/{id}", "/media/{id}/stream"] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
